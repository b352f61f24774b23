//! Worker registration state and persistence
//!
//! Tracks every cache generation through
//! installing → waiting → active → stale → purged.

use crate::error::{SwError, SwResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Purged generations kept for `status` history
const MAX_PURGED_HISTORY: usize = 10;

/// Lifecycle state of one generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationState {
    Installing,
    Waiting,
    Active,
    Stale,
    Purged,
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Installing => "installing",
            Self::Waiting => "waiting",
            Self::Active => "active",
            Self::Stale => "stale",
            Self::Purged => "purged",
        };
        write!(f, "{}", name)
    }
}

/// One version tag's worker and store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    /// Version tag, also the cache store name
    pub tag: String,

    /// Worker instance that installed this generation
    pub worker_id: Uuid,

    pub state: GenerationState,

    pub installed_at: DateTime<Utc>,

    pub changed_at: DateTime<Utc>,
}

impl Generation {
    fn new(tag: &str) -> Self {
        let now = Utc::now();
        Self {
            tag: tag.to_string(),
            worker_id: Uuid::new_v4(),
            state: GenerationState::Installing,
            installed_at: now,
            changed_at: now,
        }
    }

    fn set_state(&mut self, state: GenerationState) {
        self.state = state;
        self.changed_at = Utc::now();
    }
}

/// All known generations, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registration {
    pub generations: Vec<Generation>,
}

impl Registration {
    fn in_state(&self, state: GenerationState) -> Option<&Generation> {
        self.generations.iter().find(|g| g.state == state)
    }

    /// The generation currently controlling pages
    pub fn active(&self) -> Option<&Generation> {
        self.in_state(GenerationState::Active)
    }

    /// The installed generation waiting for promotion
    pub fn waiting(&self) -> Option<&Generation> {
        self.in_state(GenerationState::Waiting)
    }

    pub fn installing(&self) -> Option<&Generation> {
        self.in_state(GenerationState::Installing)
    }

    /// Most recent record for a tag
    pub fn generation(&self, tag: &str) -> Option<&Generation> {
        self.generations.iter().rev().find(|g| g.tag == tag)
    }

    /// Start installing `tag`; any installing or waiting generation is superseded
    pub fn begin_install(&mut self, tag: &str) -> Uuid {
        for generation in &mut self.generations {
            if matches!(
                generation.state,
                GenerationState::Installing | GenerationState::Waiting
            ) {
                generation.set_state(GenerationState::Stale);
            }
        }

        let generation = Generation::new(tag);
        let worker_id = generation.worker_id;
        self.generations.push(generation);
        worker_id
    }

    /// Installing → waiting
    pub fn install_complete(&mut self, tag: &str) -> SwResult<()> {
        let generation = self
            .generations
            .iter_mut()
            .rev()
            .find(|g| g.tag == tag && g.state == GenerationState::Installing)
            .ok_or_else(|| SwError::Internal(format!("no install in progress for {}", tag)))?;
        generation.set_state(GenerationState::Waiting);
        Ok(())
    }

    /// Installing → purged; the store was dropped
    pub fn install_failed(&mut self, tag: &str) {
        if let Some(generation) = self
            .generations
            .iter_mut()
            .rev()
            .find(|g| g.tag == tag && g.state == GenerationState::Installing)
        {
            generation.set_state(GenerationState::Purged);
        }
    }

    /// Waiting → active, previous active → stale. Returns the promoted tag.
    pub fn promote(&mut self) -> Option<String> {
        let index = self
            .generations
            .iter()
            .position(|g| g.state == GenerationState::Waiting)?;

        for generation in &mut self.generations {
            if generation.state == GenerationState::Active {
                generation.set_state(GenerationState::Stale);
            }
        }

        let generation = &mut self.generations[index];
        generation.set_state(GenerationState::Active);
        Some(generation.tag.clone())
    }

    /// Every stale generation → purged, except those whose store is in `retained`
    ///
    /// Covers stale records that share a tag with the active generation,
    /// such as a superseded reinstall of the same version.
    pub fn purge_stale(&mut self, retained: &[&str]) {
        for generation in &mut self.generations {
            if generation.state == GenerationState::Stale
                && !retained.contains(&generation.tag.as_str())
            {
                generation.set_state(GenerationState::Purged);
            }
        }
    }

    /// Drop the oldest purged records beyond the history limit
    pub fn prune_history(&mut self) {
        let purged = self
            .generations
            .iter()
            .filter(|g| g.state == GenerationState::Purged)
            .count();
        let mut excess = purged.saturating_sub(MAX_PURGED_HISTORY);

        self.generations.retain(|g| {
            if excess > 0 && g.state == GenerationState::Purged {
                excess -= 1;
                false
            } else {
                true
            }
        });
    }
}

/// Where the registration lives between runs
#[derive(Debug, Clone, Default)]
pub struct RegistrationStore {
    path: Option<PathBuf>,
}

impl RegistrationStore {
    /// Persist to a JSON file
    pub fn file(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Keep the registration in memory only
    pub fn memory() -> Self {
        Self { path: None }
    }

    /// Load the registration, empty if nothing was saved yet
    pub async fn load(&self) -> SwResult<Registration> {
        let Some(ref path) = self.path else {
            return Ok(Registration::default());
        };

        if !path.exists() {
            return Ok(Registration::default());
        }

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| SwError::io(format!("reading registration {}", path.display()), e))?;

        let registration: Registration = serde_json::from_str(&content)?;
        Ok(registration)
    }

    /// Save the registration
    pub async fn save(&self, registration: &Registration) -> SwResult<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SwError::StatePersist(format!("{}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(registration)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)
            .await
            .map_err(|e| SwError::StatePersist(format!("{}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, path)
            .await
            .map_err(|e| SwError::StatePersist(format!("{}: {}", path.display(), e)))?;

        debug!("Saved registration to {}", path.display());
        Ok(())
    }
}

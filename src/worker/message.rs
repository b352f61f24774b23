//! Control messages from the hosting page

use serde_json::Value;

const SKIP_WAITING: &str = "skipWaiting";

/// A message posted to the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    /// Promote the waiting worker now
    SkipWaiting,
    /// Anything else; ignored
    Unknown(String),
}

impl ControlMessage {
    /// Parse a payload
    ///
    /// Accepts the bare string `skipWaiting`, the JSON string
    /// `"skipWaiting"`, or a JSON object whose `type` or `action` field is
    /// `skipWaiting` / `SKIP_WAITING`.
    pub fn parse(payload: &str) -> Self {
        let trimmed = payload.trim();
        if trimmed == SKIP_WAITING {
            return Self::SkipWaiting;
        }

        let recognized = match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::String(s)) => s == SKIP_WAITING,
            Ok(Value::Object(map)) => ["type", "action"].iter().any(|field| {
                map.get(*field)
                    .and_then(Value::as_str)
                    .is_some_and(is_skip_waiting)
            }),
            _ => false,
        };

        if recognized {
            Self::SkipWaiting
        } else {
            Self::Unknown(payload.to_string())
        }
    }
}

fn is_skip_waiting(value: &str) -> bool {
    value == SKIP_WAITING || value == "SKIP_WAITING"
}

//! Status command - registration, generations and stores

use crate::cli::args::{OutputFormat, StatusArgs};
use crate::config::{Config, ConfigManager};
use crate::error::SwResult;
use crate::net::{create_fetcher, NetworkMode};
use crate::ui::{self, UiContext};
use crate::worker::{Generation, GenerationState, ServiceWorker};
use console::style;
use serde::Serialize;

#[derive(Serialize)]
struct StoreSummary {
    name: String,
    entries: usize,
    current: bool,
}

#[derive(Serialize)]
struct StatusJson {
    version: String,
    origin: String,
    state_dir: String,
    active: Option<String>,
    waiting: Option<String>,
    generations: Vec<Generation>,
    stores: Vec<StoreSummary>,
}

/// Execute the status command
pub async fn execute(args: StatusArgs, config: &Config) -> SwResult<()> {
    let fetcher = create_fetcher(config, NetworkMode::Offline)?;
    let worker = ServiceWorker::on_disk(config, fetcher).await?;

    let registration = worker.lifecycle().registration().await;
    let active = registration.active().map(|g| g.tag.clone());

    let mut stores = Vec::new();
    for name in worker.storage().names().await? {
        let entries = worker.storage().entries(&name).await?.len();
        let current = active.as_deref() == Some(name.as_str());
        stores.push(StoreSummary {
            name,
            entries,
            current,
        });
    }

    let status = StatusJson {
        version: config.worker.version.clone(),
        origin: config.worker.origin.clone(),
        state_dir: ConfigManager::state_dir(config).display().to_string(),
        active,
        waiting: registration.waiting().map(|g| g.tag.clone()),
        generations: registration.generations,
        stores,
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Plain => {
            println!("{}", status.active.as_deref().unwrap_or("-"));
        }
        OutputFormat::Table => print_table(&status),
    }

    Ok(())
}

fn state_style(state: GenerationState) -> console::StyledObject<String> {
    let text = state.to_string();
    match state {
        GenerationState::Active => style(text).green(),
        GenerationState::Waiting | GenerationState::Installing => style(text).yellow(),
        GenerationState::Stale => style(text).red(),
        GenerationState::Purged => style(text).dim(),
    }
}

fn print_table(status: &StatusJson) {
    let ctx = UiContext::detect();
    ui::intro(&ctx, "ponto-sw status");

    ui::key_value(&ctx, "configured version", &status.version);
    ui::key_value(&ctx, "origin", &status.origin);
    ui::key_value(&ctx, "state dir", &status.state_dir);
    ui::key_value_status(
        &ctx,
        "active",
        status.active.as_deref().unwrap_or("none"),
        status.active.is_some(),
    );
    if let Some(ref waiting) = status.waiting {
        ui::key_value_status(&ctx, "waiting", waiting, false);
    }

    ui::section(&ctx, "Generations");
    if status.generations.is_empty() {
        ui::step_info(&ctx, "Nothing installed yet");
        ui::remark(&ctx, "Run: ponto-sw install");
    } else {
        println!(
            "{:<16} {:<12} {:<10} {:<20}",
            style("TAG").bold(),
            style("STATE").bold(),
            style("WORKER").bold(),
            style("CHANGED").bold()
        );
        println!("{}", "-".repeat(60));
        for generation in &status.generations {
            let worker_id = generation.worker_id.to_string();
            println!(
                "{:<16} {:<12} {:<10} {:<20}",
                generation.tag,
                state_style(generation.state),
                &worker_id[..8],
                generation.changed_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    ui::section(&ctx, "Stores");
    if status.stores.is_empty() {
        ui::step_info(&ctx, "No cache stores");
        return;
    }
    for store in &status.stores {
        let marker = if store.current {
            style("*").green().to_string()
        } else {
            style("stale").red().to_string()
        };
        println!("  {:<16} {:>5} entries  {}", store.name, store.entries, marker);
    }
}

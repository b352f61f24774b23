//! Cache command - inspect or wipe cache stores

use crate::cache::{CacheStorage, DiskCacheStorage};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::{Config, ConfigManager};
use crate::error::SwResult;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> SwResult<()> {
    ConfigManager::ensure_state_dirs(config).await?;
    let storage = DiskCacheStorage::new(ConfigManager::caches_dir(config)).await?;

    match args.action {
        CacheAction::List { format } => list_stores(&storage, config, format).await,
        CacheAction::Keys { tag, format } => list_keys(&storage, &tag, format).await,
        CacheAction::Clear { yes } => clear_stores(&storage, yes).await,
    }
}

#[derive(Serialize)]
struct StoreJson {
    name: String,
    entries: usize,
    bytes: usize,
    configured: bool,
}

/// List all cache stores
async fn list_stores(
    storage: &dyn CacheStorage,
    config: &Config,
    format: OutputFormat,
) -> SwResult<()> {
    let mut stores = Vec::new();
    for name in storage.names().await? {
        let entries = storage.entries(&name).await?;
        stores.push(StoreJson {
            configured: name == config.worker.version,
            bytes: entries.iter().map(|e| e.body.len()).sum(),
            entries: entries.len(),
            name,
        });
    }

    if stores.is_empty() {
        match format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::step_info(&ctx, "No cache stores");
            }
        }
        return Ok(());
    }

    match format {
        OutputFormat::Table => {
            println!(
                "{:<20} {:>8} {:>12} {:<10}",
                style("STORE").bold(),
                style("ENTRIES").bold(),
                style("BYTES").bold(),
                style("VERSION").bold()
            );
            println!("{}", "-".repeat(54));
            for store in &stores {
                let marker = if store.configured {
                    style("current").green()
                } else {
                    style("stale").dim()
                };
                println!(
                    "{:<20} {:>8} {:>12} {:<10}",
                    store.name, store.entries, store.bytes, marker
                );
            }
            println!();
            println!("Total: {} store(s)", stores.len());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stores)?),
        OutputFormat::Plain => {
            for store in &stores {
                println!("{}", store.name);
            }
        }
    }

    Ok(())
}

/// List the keys held by one store
async fn list_keys(storage: &dyn CacheStorage, tag: &str, format: OutputFormat) -> SwResult<()> {
    let entries = storage.entries(tag).await?;

    match format {
        OutputFormat::Table => {
            println!(
                "{:<6} {:<6} {:<50} {:<20}",
                style("METHOD").bold(),
                style("STATUS").bold(),
                style("URL").bold(),
                style("CACHED").bold()
            );
            println!("{}", "-".repeat(84));
            for entry in &entries {
                println!(
                    "{:<6} {:<6} {:<50} {:<20}",
                    entry.method,
                    entry.status,
                    entry.url,
                    entry.cached_at.format("%Y-%m-%d %H:%M")
                );
            }
            println!();
            println!("Total: {} entr(ies)", entries.len());
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct KeyJson<'a> {
                method: &'a str,
                url: &'a str,
                status: u16,
                cached_at: String,
            }
            let keys: Vec<KeyJson> = entries
                .iter()
                .map(|e| KeyJson {
                    method: &e.method,
                    url: &e.url,
                    status: e.status,
                    cached_at: e.cached_at.to_rfc3339(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.key);
            }
        }
    }

    Ok(())
}

/// Delete every store
async fn clear_stores(storage: &dyn CacheStorage, yes: bool) -> SwResult<()> {
    let ctx = UiContext::detect().with_auto_yes(yes);
    let names = storage.names().await?;

    if names.is_empty() {
        ui::step_info(&ctx, "No cache stores to clear");
        return Ok(());
    }

    let prompt = format!("Delete {} cache store(s)?", names.len());
    if !ui::confirm(&ctx, &prompt, false).await? {
        ui::step_info(&ctx, "Aborted");
        return Ok(());
    }

    let mut deleted = 0;
    for name in &names {
        match storage.delete(name).await {
            Ok(_) => {
                ui::step_ok_detail(&ctx, "Deleted", name);
                deleted += 1;
            }
            Err(e) => ui::step_error_detail(&ctx, &format!("Failed to delete {}", name), &e.to_string()),
        }
    }

    ui::outro_success(&ctx, &format!("Cleared {} store(s)", deleted));
    ui::remark(&ctx, "Assets are fetched again on demand");
    Ok(())
}

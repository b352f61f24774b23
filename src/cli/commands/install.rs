//! Install command - run the install event

use crate::cli::args::InstallArgs;
use crate::cli::commands::activate::print_activation;
use crate::config::Config;
use crate::error::SwResult;
use crate::net::{create_fetcher, NetworkMode};
use crate::ui::{self, UiContext};
use crate::worker::ServiceWorker;

/// Execute the install command
pub async fn execute(args: InstallArgs, config: &Config) -> SwResult<()> {
    let ctx = UiContext::detect();
    let fetcher = create_fetcher(config, NetworkMode::from_offline_flag(args.offline))?;
    let worker = ServiceWorker::on_disk(config, fetcher).await?;

    ui::intro(&ctx, &format!("Installing {}", config.worker.version));

    let report = worker.install().await?;

    if report.already_active {
        ui::step_info(&ctx, &format!("{} is already active", report.tag));
        ui::remark(&ctx, "Bump worker.version to publish a new release");
        return Ok(());
    }

    for asset in &report.seeded {
        ui::step_ok(&ctx, asset);
    }
    for failure in &report.failed {
        ui::step_warn_hint(&ctx, &failure.asset, &failure.reason);
    }

    match report.promoted {
        Some(ref activation) => {
            print_activation(&ctx, activation);
            ui::outro_success(&ctx, &format!("{} is active", report.tag));
        }
        None => {
            ui::outro_warn(&ctx, &format!("{} installed and waiting", report.tag));
            ui::remark(&ctx, "Run: ponto-sw activate (or: ponto-sw message skipWaiting)");
        }
    }

    Ok(())
}

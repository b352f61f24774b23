//! Activate command - promote the waiting generation

use crate::config::Config;
use crate::error::SwResult;
use crate::net::{create_fetcher, NetworkMode};
use crate::ui::{self, UiContext};
use crate::worker::{ActivateReport, ServiceWorker};

/// Execute the activate command
pub async fn execute(config: &Config) -> SwResult<()> {
    let ctx = UiContext::detect();
    // Activation never touches the network
    let fetcher = create_fetcher(config, NetworkMode::Offline)?;
    let worker = ServiceWorker::on_disk(config, fetcher).await?;

    let report = worker.activate().await?;
    print_activation(&ctx, &report);
    ui::outro_success(&ctx, &format!("{} is active", report.tag));

    Ok(())
}

/// Print what an activation did
pub(crate) fn print_activation(ctx: &UiContext, report: &ActivateReport) {
    if report.deleted.is_empty() && report.delete_failures.is_empty() {
        ui::step_info(ctx, "No stale stores");
    }
    for store in &report.deleted {
        ui::step_ok_detail(ctx, "Deleted stale store", store);
    }
    for failure in &report.delete_failures {
        ui::step_warn_hint(
            ctx,
            &format!("Could not delete store {}", failure.store),
            &failure.reason,
        );
    }
    ui::key_value(ctx, "claimed pages", &report.claimed.to_string());
}

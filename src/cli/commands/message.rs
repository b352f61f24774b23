//! Message command - post a control message

use crate::cli::args::MessageArgs;
use crate::cli::commands::activate::print_activation;
use crate::config::Config;
use crate::error::SwResult;
use crate::net::{create_fetcher, NetworkMode};
use crate::ui::{self, UiContext};
use crate::worker::{MessageOutcome, ServiceWorker};

/// Execute the message command
pub async fn execute(args: MessageArgs, config: &Config) -> SwResult<()> {
    let ctx = UiContext::detect();
    let fetcher = create_fetcher(config, NetworkMode::Offline)?;
    let worker = ServiceWorker::on_disk(config, fetcher).await?;

    match worker.handle_message(&args.payload).await? {
        MessageOutcome::Promoted(report) => {
            print_activation(&ctx, &report);
            ui::outro_success(&ctx, &format!("{} promoted", report.tag));
        }
        MessageOutcome::NothingWaiting => {
            ui::step_info(&ctx, "No waiting generation to promote");
        }
        MessageOutcome::Ignored => {
            ui::step_warn_hint(
                &ctx,
                "Message ignored",
                "The only recognized message is skipWaiting",
            );
        }
    }

    Ok(())
}

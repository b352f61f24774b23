//! ponto-sw - Offline worker for the Ponto Eletrônico web app
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use ponto_sw::cli::{self, Cli, Commands};
use ponto_sw::config::ConfigManager;
use ponto_sw::error::SwResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, json: bool) {
    let filter = match verbose {
        0 => EnvFilter::new("ponto_sw=warn"),
        1 => EnvFilter::new("ponto_sw=info"),
        _ => EnvFilter::new("ponto_sw=debug"),
    };

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run() -> SwResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // Neither of these needs a loadable config file
    let command = match cli.command {
        Commands::Completions(args) => return cli::commands::completions(args),
        Commands::Config(args) => {
            init_logging(cli.verbose, false);
            return cli::commands::config(args, &manager).await;
        }
        command => command,
    };

    let mut config = manager.load().await?;
    if let Some(dir) = cli.state_dir {
        config.storage.state_dir = Some(dir);
    }

    init_logging(cli.verbose, config.general.log_format == "json");
    debug!("State directory: {}", ConfigManager::state_dir(&config).display());

    match command {
        Commands::Install(args) => cli::commands::install(args, &config).await,
        Commands::Activate => cli::commands::activate(&config).await,
        Commands::Message(args) => cli::commands::message(args, &config).await,
        Commands::Fetch(args) => cli::commands::fetch(args, &config).await,
        Commands::Status(args) => cli::commands::status(args, &config).await,
        Commands::Cache(args) => cli::commands::cache(args, &config).await,
        Commands::Completions(_) | Commands::Config(_) => unreachable!("handled above"),
    }
}

//! Completions command - print a shell completion script

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::SwResult;
use clap::CommandFactory;
use std::io;

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> SwResult<()> {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "ponto-sw", &mut io::stdout());
    Ok(())
}

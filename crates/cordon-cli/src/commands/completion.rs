// SPDX-License-Identifier: Apache-2.0

//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::{Cli, CompletionCommand};

/// Generates a completion script on stdout.
pub fn run(command: &CompletionCommand) {
    match command {
        CompletionCommand::Generate { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "cordon", &mut std::io::stdout());
        }
    }
}

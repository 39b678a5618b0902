//! covbadge: coverage badge service
//!
//! ## Usage
//!
//! ```bash
//! covbadge                                  # serve with ./conf.json
//! covbadge -c /etc/covbadge.json serve      # serve with another config
//! covbadge percent coverage.out             # print local coverage
//! covbadge badge-url coverage.out --shield https://img.shields.io/badge
//! ```

use clap::Parser;
use covbadge_server::{handlers, logging, Cli, Commands, ServerResult};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> ServerResult<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => handlers::execute_serve(&cli.config),
        Commands::Percent(args) => handlers::execute_percent(&args),
        Commands::BadgeUrl(args) => handlers::execute_badge_url(&args),
    }
}

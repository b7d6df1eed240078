// SPDX-FileCopyrightText: 2026 Helpline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpline - customer support chat relay.
//!
//! This is the binary entry point for the Helpline service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod patterns;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use helpline_config::{ConfigError, HelplineConfig};

/// Helpline - customer support chat relay.
#[derive(Parser, Debug)]
#[command(name = "helpline", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the HTTP gateway and the Telegram control channel (default).
    Serve,
    /// Print the effective configuration with secrets redacted.
    Config,
    /// List the knowledge base patterns stored in the database.
    Patterns,
}

fn load_config(path: Option<&std::path::Path>) -> Result<HelplineConfig, Vec<ConfigError>> {
    match path {
        Some(path) => helpline_config::load_and_validate_path(path),
        None => helpline_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            helpline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Config => match toml::to_string_pretty(&config.redacted()) {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            Err(e) => Err(helpline_core::HelplineError::Internal(format!(
                "failed to render configuration: {e}"
            ))),
        },
        Commands::Patterns => patterns::run_patterns(&config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

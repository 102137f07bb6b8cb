// SPDX-FileCopyrightText: 2026 Bl1nk Architect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bl1nk Architect - audits GitHub repositories from a chat bot.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use std::path::PathBuf;

use architect_config::{ArchitectConfig, ConfigError};
use clap::{Parser, Subcommand};

/// Bl1nk Architect - audits GitHub repositories from a chat bot.
#[derive(Parser, Debug)]
#[command(name = "architect", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Manage configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Validate configuration and report problems.
    Check,
}

fn load(path: Option<&PathBuf>) -> Result<ArchitectConfig, Vec<ConfigError>> {
    match path {
        Some(path) => architect_config::load_and_validate_path(path),
        None => architect_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            architect_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config {
            action: ConfigCommands::Check,
        }) => {
            let warnings = serve::readiness_warnings(&config);
            println!("architect: config valid (agent.name={})", config.agent.name);
            for warning in &warnings {
                println!("  warning: {warning}");
            }
        }
        None => {
            println!("architect: use --help for available commands");
        }
    }
}

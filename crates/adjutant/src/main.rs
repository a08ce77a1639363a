// SPDX-FileCopyrightText: 2026 Adjutant Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adjutant - a personal chief-of-staff agent.
//!
//! This is the binary entry point for the Adjutant agent.

use clap::{Parser, Subcommand};

mod serve;

/// Adjutant - a personal chief-of-staff agent.
#[derive(Parser, Debug)]
#[command(name = "adjutant", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Adjutant agent server.
    Serve,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match adjutant_config::load_and_validate() {
        Ok(config) => {
            eprintln!(
                "adjutant: config loaded (agent.name={})",
                config.agent.name
            );
            config
        }
        Err(errors) => {
            adjutant_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("adjutant serve failed: {e}");
                std::process::exit(1);
            }
        }
        None => {
            println!("adjutant: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed)
        let config = adjutant_config::load_and_validate()
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "adjutant");
    }
}

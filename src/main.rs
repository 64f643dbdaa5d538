//! Credential tool: hash, verify, and policy-check gateway passwords.
//!
//! Loads configuration, initialises logging, and dispatches the selected
//! command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use credential_core::config::CredentialConfig;
use credential_core::error::AppError;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(&config).await {
        tracing::debug!(kind = %e.kind, "Command failed");
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration(cli: &Cli) -> Result<CredentialConfig, AppError> {
    let env = std::env::var("CREDENTIAL_ENV").unwrap_or_else(|_| "development".to_string());
    CredentialConfig::load_from(&cli.config, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &CredentialConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

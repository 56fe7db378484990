use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod authorized_keys;
mod cli;
mod commands;
mod domain;
mod services;

pub use cli::{Cli, Commands, ScanArgs};
pub use commands::{handle_config, handle_keys, handle_scan};
pub use domain::models::*;
pub use services::config::{load_config, LoadedConfig};
pub use services::gather::{gather_keys, OwnerPolicy};
pub use services::output::{key_row, print_one, report_lines};
pub use services::owners::{OwnerResolver, SystemOwners};

/// Logs go to stderr so stdout carries only the report. `RUST_LOG` wins
/// over `--log-level` when set.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match &cli.command {
        Commands::Scan(args) => {
            let loaded = load_config(cli.config.as_deref())?;
            let any_problems = handle_scan(&cli, loaded.params, args)?;
            if any_problems && args.fail_on_problems {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Keys { paths } => handle_keys(&cli, paths)?,
        Commands::Config => {
            let loaded = load_config(cli.config.as_deref())?;
            handle_config(&cli, loaded)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

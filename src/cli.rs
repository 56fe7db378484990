use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "keyscan",
    version,
    about = "Scan authorized_keys files and report duplicated and forbidden keys"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (default: /etc/keyscan/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Logging level (error|warn|info|debug|trace)"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Gather keys from the target files and report problems
    Scan(ScanArgs),
    /// List the keys parsed from the given files
    Keys {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Show the effective scan configuration
    Config,
}

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    #[arg(long = "target", value_name = "GLOB", help = "Target file glob (repeatable)")]
    pub targets: Vec<String>,
    #[arg(long, value_name = "FILE", help = "Permitted key list (repeatable)")]
    pub permitted: Vec<String>,
    #[arg(long, value_name = "FILE", help = "Forbidden key list (repeatable)")]
    pub forbidden: Vec<String>,
    #[arg(long = "ignore-owner", value_name = "USER", help = "Owner to ignore (repeatable)")]
    pub ignored_owners: Vec<String>,
    #[arg(long, value_name = "UID", help = "Exempt accounts with a uid below this")]
    pub lower_uid_bound: Option<u32>,
    #[arg(long, default_value_t = false, help = "Exit with status 1 when problems are found")]
    pub fail_on_problems: bool,
}

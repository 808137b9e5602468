pub mod toml_config;

use clap::Parser;
use std::path::PathBuf;

pub use toml_config::NimbusConfig;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "nimbus", version)]
#[command(about = "Collection of personal scripts and other utilities organized in a simple to use CLI")]
#[command(
    long_about = "Collection of personal scripts and other utilities organized in a simple to use CLI.\n\n\
                  Check each sub-group/sub-command using `--help` for specific information on them."
)]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Path to TOML configuration file (defaults to ~/.nimbus/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the data cache (overrides `[data] path`)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

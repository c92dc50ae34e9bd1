//! Command-line interface for vmtpl.
//!
//! # Available Commands
//!
//! - `resolve` - Resolve the parent template of each VM against a template
//!   snapshot loaded from manifests
//! - `key` - Print the template cache key each VM derives to
//!
//! # Global Options
//!
//! - `--verbose` - Debug logging
//! - `--quiet` - Errors only
//! - `--config` - Path to a configuration file (also `VMTPL_CONFIG`)
//!
//! # Example
//!
//! ```bash
//! vmtpl resolve --templates ./templates --vm ./vm.yaml
//! vmtpl --verbose key --vm ./vms/
//! ```

mod key;
mod resolve;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::ResolverConfig;

/// Runtime settings derived from global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the level chosen by flags. Calling
    /// this more than once is harmless.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(&self.log_level)
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Output format shared by the subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Resolve parent templates of KubeVirt virtual machines.
#[derive(Parser)]
#[command(
    name = "vmtpl",
    about = "Resolve the parent template of virtual machines",
    version,
    long_about = "vmtpl derives the template cache key recorded in a VM's annotations and looks the template up in a template store snapshot."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to a configuration file; `VMTPL_CONFIG` is read by the config
    /// loader when this is absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the parent template of each VM.
    ///
    /// Templates from --templates are loaded into an in-memory template store;
    /// every VirtualMachine found under --vm is then resolved against it.
    Resolve(resolve::ResolveCommand),

    /// Print the template cache key of each VM without resolving it.
    Key(key::KeyCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
        }
    }

    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let resolver_config = ResolverConfig::load_with_optional(config.config_path).await?;

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&resolver_config).await,
            Commands::Key(cmd) => cmd.execute(&resolver_config).await,
        }
    }
}

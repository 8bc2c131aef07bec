use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "instill-config",
    about = "Resolve Instill CLI directories and migrate legacy configuration",
    long_about = "instill-config locates the Instill CLI's config, state and data directories
and keeps the configuration in its current layout.

Directories are resolved with this precedence:
  • config: $INSTILL_CONFIG_DIR, $XDG_CONFIG_HOME/instill, %AppData%/Instill CLI, ~/.config/instill
  • state:  $XDG_STATE_HOME/instill, %LocalAppData%/Instill CLI, ~/.local/instill/state
  • data:   $XDG_DATA_HOME/instill, %LocalAppData%/Instill CLI, ~/.local/share/instill

Files:
  • <config>/config.yml: primary configuration
  • <config>/hosts.yml: per-host settings, merged under `hosts`
  • <state>/state.yml: moved out of ~/.config/instill when needed

A config.yml in the legacy per-host layout is backed up to config.yml.bak
and rewritten the first time it is loaded.",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use this config directory as-is (skips legacy directory migration)
    #[arg(long, global = true, env = "INSTILL_CONFIG_DIR", value_hint = clap::ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Enable debug output (shows INFO and DEBUG messages)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable trace output (shows all log messages including TRACE)
    #[arg(short = 't', long, global = true)]
    pub trace: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved config, state and data directories
    Paths {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move legacy directories into place and upgrade a legacy config.yml
    Migrate,

    /// Print a configuration value
    Get {
        key: String,

        /// Read the value for this host
        #[arg(short = 'H', long, default_value = "")]
        host: String,
    },

    /// Set a configuration value and write config.yml
    Set {
        key: String,
        value: String,

        /// Set the value for this host
        #[arg(short = 'H', long, default_value = "")]
        host: String,
    },

    /// List configured hostnames
    Hosts,
}

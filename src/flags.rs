//! Global client options shared by the host client and plugins.
//!
//! Both sides install the same flags on their root command. The host forwards
//! its raw argument vector to a plugin, so options given before the plugin
//! name (`docker -D --config /x helloworld`) are parsed again by the plugin.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Args;
use tracing_subscriber::EnvFilter;

/// Log levels accepted by `--log-level`.
pub const LOG_LEVELS: [&str; 5] = ["debug", "info", "warn", "error", "fatal"];

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    /// Location of client config files
    #[arg(long, value_name = "string")]
    pub config: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Set the logging level ("debug"|"info"|"warn"|"error"|"fatal")
    #[arg(
        short = 'l',
        long,
        value_name = "string",
        default_value = "info",
        value_parser = clap::builder::PossibleValuesParser::new(LOG_LEVELS)
    )]
    pub log_level: String,
}

impl ClientOptions {
    /// The tracing filter directive implied by these options.
    pub fn filter_directive(&self) -> &str {
        if self.debug {
            return "debug";
        }
        match self.log_level.as_str() {
            "fatal" => "error",
            "" => "info",
            other => other,
        }
    }

    /// Initialize logging to stderr. `RUST_LOG` takes precedence when set.
    ///
    /// Safe to call more than once; only the first call installs a subscriber.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.filter_directive()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal())
            .with_target(false)
            .try_init();
    }
}

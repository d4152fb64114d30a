//! Host command-line client.

pub(crate) mod help;
pub(crate) mod plugins;

use std::ffi::OsString;
use std::fmt;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use tracing::warn;

use dockercli::config::{Config, ConfigFile};
use dockercli::flags::ClientOptions;

/// Exit status for command-line usage errors.
pub(crate) const USAGE_ERROR_STATUS: u8 = 125;

#[derive(Parser, Debug)]
#[command(name = "docker", bin_name = "docker")]
#[command(about = help::ROOT_ABOUT, long_about = None)]
#[command(disable_help_flag = true, disable_help_subcommand = true)]
#[command(disable_version_flag = true)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub options: ClientOptions,

    /// Print usage
    #[arg(short = 'h', long, action = ArgAction::SetTrue, hide = true)]
    pub help: bool,

    /// Print version information and quit
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Show the Docker version information
    Version,
    /// List CLI plugins
    Plugins {
        /// Include invalid and shadowed plugins
        #[arg(short, long)]
        all: bool,
    },
    /// Help about the command
    Help {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        topic: Vec<String>,
    },
    /// Any other name is looked up as a CLI plugin
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

/// An error carrying the exit status the process should end with.
#[derive(Debug)]
pub(crate) struct StatusError {
    pub status: String,
    pub code: u8,
}

impl StatusError {
    pub(crate) fn new(status: impl Into<String>, code: u8) -> Self {
        Self {
            status: status.into(),
            code,
        }
    }

    /// The uniform error for a name that cannot be run.
    pub(crate) fn not_a_command(name: &str) -> Self {
        Self::new(
            format!(
                "docker: '{}' is not a docker command.\nSee 'docker --help'",
                name
            ),
            1,
        )
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status)
    }
}

impl std::error::Error for StatusError {}

/// Parse `args` (including the program name) and run the requested command.
/// Returns the exit status.
pub(crate) fn run(args: Vec<OsString>) -> Result<u8> {
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return Ok(if e.use_stderr() { USAGE_ERROR_STATUS } else { 0 });
        }
    };

    cli.options.init_logging();

    if cli.version {
        return cmd_version();
    }

    let config = load_config(&cli.options);
    let dirs = config.plugin_dirs();
    let tree = Cli::command();
    let raw_args = args.get(1..).unwrap_or_default();

    if cli.help {
        let topic = help_topic(cli.command.as_ref());
        return help::cmd_help(&topic, &dirs, &tree);
    }

    match cli.command {
        None => help::cmd_help(&[], &dirs, &tree),
        Some(Commands::Version) => cmd_version(),
        Some(Commands::Help { topic }) => help::cmd_help(&topic, &dirs, &tree),
        Some(Commands::Plugins { all }) => plugins::cmd_plugins(&dirs, &tree, all),
        Some(Commands::External(ext)) => plugins::cmd_run_plugin(&ext, raw_args, &dirs, &tree),
    }
}

fn cmd_version() -> Result<u8> {
    println!("Docker version {}", env!("CARGO_PKG_VERSION"));
    Ok(0)
}

/// `docker --help <command> ...` is `docker help <command> ...`.
fn help_topic(command: Option<&Commands>) -> Vec<String> {
    match command {
        None => Vec::new(),
        Some(Commands::Version) => vec!["version".to_string()],
        Some(Commands::Plugins { .. }) => vec!["plugins".to_string()],
        Some(Commands::Help { topic }) => topic.clone(),
        Some(Commands::External(ext)) => ext
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect(),
    }
}

/// Load the client configuration. A broken config file is reported and
/// the defaults are used so every command keeps working.
fn load_config(options: &ClientOptions) -> Config {
    let dir = options.config.clone().unwrap_or_else(Config::dir);
    match Config::load_from(dir.clone()) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Error loading config file");
            Config::with_file(dir, ConfigFile::default())
        }
    }
}

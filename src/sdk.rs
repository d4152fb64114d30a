//! Plugin-side entry point
//!
//! Builds the root command a plugin executable parses its arguments with.
//! The host forwards its raw arguments, so the plugin sees the same global
//! client options and its own name as the first subcommand:
//!
//! ```text
//! docker-helloworld [OPTIONS] helloworld [ARG...]
//! docker-helloworld docker-cli-plugin-metadata
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::io::Write;
//! use std::process::ExitCode;
//!
//! use clap::Command;
//! use dockercli::plugins::Metadata;
//!
//! fn main() -> ExitCode {
//!     let cmd = Command::new("hello").about("Say hello");
//!     let meta = Metadata {
//!         vendor: "Acme".into(),
//!         version: "1.0.0".into(),
//!         ..Default::default()
//!     };
//!     dockercli::sdk::run(cmd, meta, |_opts, _matches, out| {
//!         writeln!(out, "hello")
//!     })
//! }
//! ```

use std::ffi::OsString;
use std::fmt::Display;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{ArgMatches, Args, Command, FromArgMatches};
use serde::Serialize;
use tracing::trace;

use crate::flags::ClientOptions;
use crate::plugins::types::{
    Metadata, METADATA_SCHEMA_VERSION, METADATA_SUBCOMMAND_NAME, NAME_PREFIX,
};

/// Run a plugin with the process arguments and exit with its status.
///
/// `handler` is called with the parsed global options, the matches of the
/// plugin's own command, and standard output.
pub fn run<F, E>(plugin: Command, metadata: Metadata, handler: F) -> ExitCode
where
    F: FnOnce(&ClientOptions, &ArgMatches, &mut dyn Write) -> Result<(), E>,
    E: Display,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    ExitCode::from(run_with_args(
        plugin,
        metadata,
        std::env::args_os(),
        &mut out,
        handler,
    ))
}

/// [`run`] with explicit arguments (including the program name) and output.
/// Returns the exit status.
pub fn run_with_args<I, T, F, E>(
    plugin: Command,
    metadata: Metadata,
    args: I,
    out: &mut dyn Write,
    handler: F,
) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    F: FnOnce(&ClientOptions, &ArgMatches, &mut dyn Write) -> Result<(), E>,
    E: Display,
{
    let metadata = metadata_document(&plugin, metadata);
    let plugin_name = plugin.get_name().to_string();
    let mut root = new_plugin_command(plugin);

    let matches = match root.try_get_matches_from_mut(args) {
        Ok(matches) => matches,
        Err(e) => {
            // Help output belongs on stdout, usage errors on stderr
            if e.use_stderr() {
                let _ = e.print();
            } else {
                let _ = write!(out, "{}", e.render());
            }
            return exit_status(e.exit_code());
        }
    };

    let options = match ClientOptions::from_arg_matches(&matches) {
        Ok(options) => options,
        Err(e) => {
            let _ = e.print();
            return exit_status(e.exit_code());
        }
    };
    options.init_logging();

    match matches.subcommand() {
        Some((METADATA_SUBCOMMAND_NAME, _)) => match write_metadata(out, &metadata) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}", e);
                1
            }
        },
        Some((name, sub)) if name == plugin_name => {
            trace!(plugin = %plugin_name, "Running plugin command");
            match handler(&options, sub, out) {
                Ok(()) => 0,
                Err(e) => {
                    eprintln!("{}", e);
                    1
                }
            }
        }
        _ => {
            let _ = write!(out, "{}", root.render_help());
            1
        }
    }
}

/// The root command wrapping `plugin`: global client options, the plugin
/// command itself, and the hidden metadata subcommand.
pub fn new_plugin_command(plugin: Command) -> Command {
    let name = plugin.get_name().to_string();

    let root = Command::new("docker")
        .bin_name("docker")
        .about(format!("{}{} is a Docker CLI plugin", NAME_PREFIX, name))
        .override_usage(format!("docker [OPTIONS] {} [ARG...]", name))
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true);

    ClientOptions::augment_args(root)
        .subcommand(plugin)
        .subcommand(
            Command::new(METADATA_SUBCOMMAND_NAME)
                .hide(true)
                .about("Print plugin metadata"),
        )
}

/// The document answered on the metadata exchange: `metadata` with the
/// schema version filled in and the short description defaulting to the
/// plugin command's `about`.
pub fn metadata_document(plugin: &Command, mut metadata: Metadata) -> Metadata {
    metadata.schema_version = METADATA_SCHEMA_VERSION.to_string();
    if metadata.short_description.is_empty() {
        if let Some(about) = plugin.get_about() {
            metadata.short_description = about.to_string();
        }
    }
    metadata
}

/// Indentation of the metadata document, matching what existing plugins print.
const METADATA_INDENT: &[u8] = b"     ";

fn write_metadata(out: &mut dyn Write, metadata: &Metadata) -> crate::error::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(METADATA_INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut *out, formatter);
    metadata.serialize(&mut ser)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

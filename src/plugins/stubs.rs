//! Plugin stubs for help rendering
//!
//! Discovered plugins are turned into inert command descriptors so a help
//! renderer can list them next to builtin commands without executing
//! anything. Merging the stubs into a command tree is left to the host.

use std::collections::BTreeMap;

use super::types::Plugin;

/// Annotation marking a command as provided by a plugin. Value is `"true"`.
pub const ANNOTATION_PLUGIN: &str = "com.docker.cli.plugin";

/// Annotation carrying the plugin vendor.
pub const ANNOTATION_VENDOR: &str = "com.docker.cli.plugin.vendor";

/// Annotation carrying the validation failure of an invalid plugin.
pub const ANNOTATION_INVALID: &str = "com.docker.cli.plugin-invalid";

/// Vendor shown for plugins that do not report one.
pub const UNKNOWN_VENDOR: &str = "unknown";

/// An inert command-tree entry standing in for a plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStub {
    pub name: String,
    pub short: String,
    pub annotations: BTreeMap<String, String>,
}

impl CommandStub {
    pub fn is_plugin(&self) -> bool {
        self.annotations
            .get(ANNOTATION_PLUGIN)
            .is_some_and(|v| v == "true")
    }

    pub fn vendor(&self) -> &str {
        self.annotations
            .get(ANNOTATION_VENDOR)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_VENDOR)
    }

    /// Why the plugin is unusable, for invalid plugins.
    pub fn invalid_reason(&self) -> Option<&str> {
        self.annotations.get(ANNOTATION_INVALID).map(String::as_str)
    }

    /// A `clap` subcommand for this stub. It accepts any arguments and has
    /// no behaviour of its own; running a plugin goes through
    /// [`super::plugin_run_command`].
    pub fn to_command(&self) -> clap::Command {
        let about = match self.invalid_reason() {
            Some(reason) => format!("Invalid plugin: {}", reason),
            None => self.short.clone(),
        };
        clap::Command::new(self.name.clone())
            .about(about)
            .disable_help_flag(true)
            .arg(
                clap::Arg::new("args")
                    .num_args(0..)
                    .trailing_var_arg(true)
                    .allow_hyphen_values(true),
            )
    }
}

/// Build stubs for `plugins`, skipping invalid ones unless
/// `include_invalid` is set.
pub fn plugin_command_stubs(plugins: &[Plugin], include_invalid: bool) -> Vec<CommandStub> {
    plugins
        .iter()
        .filter(|p| include_invalid || p.err.is_none())
        .map(stub_for)
        .collect()
}

fn stub_for(plugin: &Plugin) -> CommandStub {
    let vendor = match plugin.vendor() {
        "" => UNKNOWN_VENDOR,
        v => v,
    };

    let mut annotations = BTreeMap::new();
    annotations.insert(ANNOTATION_PLUGIN.to_string(), "true".to_string());
    annotations.insert(ANNOTATION_VENDOR.to_string(), vendor.to_string());
    if let Some(err) = &plugin.err {
        annotations.insert(ANNOTATION_INVALID.to_string(), err.to_string());
    }

    CommandStub {
        name: plugin.name.clone(),
        short: plugin.short_description().to_string(),
        annotations,
    }
}

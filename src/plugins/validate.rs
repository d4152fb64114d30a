//! Plugin validation via the metadata exchange
//!
//! A candidate is run once with the hidden [`METADATA_SUBCOMMAND_NAME`]
//! argument. Its standard output is captured and decoded as [`Metadata`];
//! its standard error is passed through so a misbehaving plugin's
//! diagnostics stay visible.
//!
//! The child is waited on without a timeout. A plugin that never exits
//! blocks the calling client invocation.

use std::process::{Command, Stdio};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{trace, warn};

use crate::error::PluginError;

use super::tree::CommandTree;
use super::types::{
    Candidate, Metadata, Plugin, METADATA_SCHEMA_VERSION, METADATA_SUBCOMMAND_NAME,
};

/// Pattern a logical plugin name must match.
pub const PLUGIN_NAME_PATTERN: &str = "^[a-z][a-z0-9_-]*$";

static PLUGIN_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(PLUGIN_NAME_PATTERN).expect("plugin name pattern is valid"));

/// Whether `name` is acceptable as a logical plugin name.
pub fn is_valid_plugin_name(name: &str) -> bool {
    PLUGIN_NAME_RE.is_match(name)
}

/// Validate `candidate` against `tree` and the metadata exchange.
///
/// Never fails: an unusable candidate yields a [`Plugin`] with `err` set.
/// A name that is malformed or taken by a builtin command is rejected
/// without executing anything; otherwise exactly one child process is run
/// to completion.
pub fn validate<T: CommandTree + ?Sized>(candidate: &Candidate, tree: &T) -> Plugin {
    let mut plugin = Plugin {
        name: candidate.name().to_string(),
        path: candidate.path().to_path_buf(),
        ..Default::default()
    };

    if !is_valid_plugin_name(&plugin.name) {
        plugin.err = Some(PluginError::InvalidCandidate(format!(
            "plugin candidate {:?} did not match {:?}",
            plugin.name, PLUGIN_NAME_PATTERN
        )));
        return plugin;
    }

    if tree.has_command(&plugin.name) {
        plugin.err = Some(PluginError::NameConflict(plugin.name.clone()));
        return plugin;
    }

    match fetch_metadata(candidate) {
        Ok(metadata) => plugin.metadata = metadata,
        Err(err) => {
            trace!(plugin = %plugin.name, path = %plugin.path.display(), error = %err, "Plugin candidate is invalid");
            plugin.err = Some(err);
        }
    }

    plugin
}

fn fetch_metadata(candidate: &Candidate) -> Result<Metadata, PluginError> {
    trace!(path = %candidate.path().display(), "Fetching plugin metadata");

    let output = Command::new(candidate.path())
        .arg(METADATA_SUBCOMMAND_NAME)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| PluginError::InvalidCandidate(format!("failed to fetch metadata: {}", e)))?;

    if !output.status.success() {
        return Err(PluginError::InvalidCandidate(format!(
            "failed to fetch metadata: {}",
            output.status
        )));
    }

    decode_metadata(&output.stdout)
}

/// Decode the metadata document printed by a plugin.
pub fn decode_metadata(raw: &[u8]) -> Result<Metadata, PluginError> {
    let invalid =
        |e: serde_json::Error| PluginError::InvalidCandidate(format!("invalid metadata: {}", e));

    // Derived struct decoding would also accept a positional array
    let value: serde_json::Value = serde_json::from_slice(raw).map_err(invalid)?;
    if !value.is_object() {
        return Err(PluginError::InvalidCandidate(format!(
            "invalid metadata: expected a JSON object, got {}",
            json_type_name(&value)
        )));
    }
    let metadata: Metadata = serde_json::from_value(value).map_err(invalid)?;

    if !metadata.schema_version.is_empty() && metadata.schema_version != METADATA_SCHEMA_VERSION {
        warn!(
            schema_version = %metadata.schema_version,
            expected = METADATA_SCHEMA_VERSION,
            "Plugin reports an unknown metadata schema version"
        );
    }

    Ok(metadata)
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

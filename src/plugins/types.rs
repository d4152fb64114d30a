//! Plugin types
//!
//! This module defines the types shared by the plugin subsystem: the
//! metadata document exchanged with a candidate executable, the
//! unvalidated [`Candidate`], and the resolved [`Plugin`] record.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Filename prefix identifying a CLI plugin executable.
pub const NAME_PREFIX: &str = "docker-";

/// Hidden subcommand every plugin must answer with its metadata document.
pub const METADATA_SUBCOMMAND_NAME: &str = "docker-cli-plugin-metadata";

/// Metadata schema version written by plugins built with [`crate::sdk`].
pub const METADATA_SCHEMA_VERSION: &str = "0.1.0";

/// Executable suffix required on the current platform.
#[cfg(windows)]
pub const EXE_SUFFIX: &str = ".exe";
#[cfg(not(windows))]
pub const EXE_SUFFIX: &str = "";

/// The metadata document a plugin prints on standard output when invoked
/// with [`METADATA_SUBCOMMAND_NAME`].
///
/// # Example
///
/// ```json
/// {
///   "SchemaVersion": "0.1.0",
///   "Vendor": "Docker Inc.",
///   "Version": "0.1.0",
///   "ShortDescription": "A basic Hello World plugin for tests",
///   "URL": "https://example.com/helloworld"
/// }
/// ```
///
/// Absent fields decode as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Metadata {
    /// Always [`METADATA_SCHEMA_VERSION`] for current plugins.
    #[serde(default)]
    pub schema_version: String,

    /// Organisation or individual providing the plugin.
    #[serde(default)]
    pub vendor: String,

    /// Version of the plugin itself.
    #[serde(default)]
    pub version: String,

    /// One-line description shown in `docker help`.
    #[serde(default)]
    pub short_description: String,

    /// Homepage of the plugin.
    #[serde(default, rename = "URL")]
    pub url: String,
}

/// Expected executable filename for the logical plugin `name`.
pub fn executable_name(name: &str) -> String {
    format!("{}{}{}", NAME_PREFIX, name, EXE_SUFFIX)
}

/// Logical plugin name encoded in `file_name`, if it follows the
/// `docker-<name>[.exe]` convention.
pub fn logical_name(file_name: &str) -> Option<&str> {
    let name = file_name.strip_prefix(NAME_PREFIX)?;
    let name = if EXE_SUFFIX.is_empty() {
        name
    } else {
        name.strip_suffix(EXE_SUFFIX)?
    };
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// An unvalidated filesystem match for the plugin naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    path: PathBuf,
    name: String,
}

impl Candidate {
    /// Build a candidate from a path whose filename follows the naming
    /// convention.
    ///
    /// # Errors
    /// `PluginError::InvalidCandidate` if the filename lacks the `docker-`
    /// prefix (or the platform executable suffix).
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, PluginError> {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|f| f.to_str())
            .and_then(logical_name)
            .map(str::to_string)
            .ok_or_else(|| {
                PluginError::InvalidCandidate(format!(
                    "plugin candidate path {:?} does not have {:?} prefix",
                    path.display().to_string(),
                    NAME_PREFIX
                ))
            })?;
        Ok(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The logical plugin name derived from the filename.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A resolved plugin candidate.
///
/// A plugin with `err` set failed validation. It is still returned from
/// discovery so it can be reported or listed; it is never executed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plugin {
    /// Logical subcommand name.
    pub name: String,

    /// Absolute path of the active executable.
    pub path: PathBuf,

    /// Same-named executables in lower-priority directories, in search
    /// order. Recorded only; never validated or executed.
    pub shadowed_paths: Vec<PathBuf>,

    /// Metadata decoded from the plugin. Empty if validation failed
    /// before decoding.
    pub metadata: Metadata,

    /// Why the candidate is invalid, if it is.
    pub err: Option<PluginError>,
}

impl Plugin {
    pub fn vendor(&self) -> &str {
        &self.metadata.vendor
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn short_description(&self) -> &str {
        &self.metadata.short_description
    }

    /// `true` when the candidate passed validation.
    pub fn is_valid(&self) -> bool {
        self.err.is_none()
    }
}

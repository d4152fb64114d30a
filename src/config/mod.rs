//! Client configuration
//!
//! Resolves the client configuration directory, loads the optional
//! `config.json` inside it, and builds the immutable plugin search path
//! ([`PluginDirs`]) handed to the plugin resolver at startup.
//!
//! # Directory resolution
//!
//! 1. `--config <dir>` on the command line
//! 2. `$DOCKER_CONFIG`
//! 3. `~/.docker`
//!
//! # Example config.json
//!
//! ```json
//! {
//!   "cliPluginsExtraDirs": ["/opt/acme/cli-plugins", "~/src/my-plugin/bin"]
//! }
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{CliError, Result};

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding the configuration directory.
pub const ENV_CONFIG_DIR: &str = "DOCKER_CONFIG";

/// Environment variable holding extra plugin directories (highest priority).
/// Entries are separated by the platform path-list separator.
pub const ENV_PLUGIN_EXTRA_DIRS: &str = "DOCKER_CLI_PLUGIN_EXTRA_DIRS";

/// Subdirectory of the configuration directory searched for plugins.
const USER_PLUGIN_DIR: &str = "cli-plugins";

/// Contents of `config.json`.
///
/// Only the fields this client understands are modelled; anything else in
/// the file is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Additional directories searched for CLI plugins, ahead of the
    /// default locations.
    #[serde(default)]
    pub cli_plugins_extra_dirs: Vec<String>,
}

/// Loaded client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    dir: PathBuf,
    file: ConfigFile,
}

impl Config {
    /// Default configuration directory (`$DOCKER_CONFIG` or `~/.docker`).
    pub fn dir() -> PathBuf {
        match env::var_os(ENV_CONFIG_DIR) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".docker"),
        }
    }

    /// Load configuration from `dir_override`, or the default directory.
    pub fn load(dir_override: Option<&Path>) -> Result<Self> {
        let dir = dir_override
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::dir);
        Self::load_from(dir)
    }

    /// Load configuration from an explicit directory.
    ///
    /// A missing `config.json` yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load_from(dir: PathBuf) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);

        let file = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                CliError::Config(format!("Failed to parse {}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                trace!(path = %path.display(), "No config file, using defaults");
                ConfigFile::default()
            }
            Err(e) => {
                return Err(CliError::Config(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self { dir, file })
    }

    /// Build a configuration from parts without touching the filesystem.
    pub fn with_file(dir: PathBuf, file: ConfigFile) -> Self {
        Self { dir, file }
    }

    /// The configuration directory in use.
    pub fn config_dir(&self) -> &Path {
        &self.dir
    }

    /// The parsed `config.json`.
    pub fn file(&self) -> &ConfigFile {
        &self.file
    }

    /// Extra plugin directories listed in `config.json`, with a leading
    /// `~/` expanded to the home directory.
    pub fn plugin_extra_dirs(&self) -> Vec<PathBuf> {
        self.file
            .cli_plugins_extra_dirs
            .iter()
            .filter(|d| !d.trim().is_empty())
            .map(|d| expand_home(d))
            .collect()
    }

    /// The plugin search path for this process.
    ///
    /// Reads [`ENV_PLUGIN_EXTRA_DIRS`] once; the returned value is immutable
    /// and should be passed to the resolver rather than recomputed.
    pub fn plugin_dirs(&self) -> PluginDirs {
        let mut extra: Vec<PathBuf> = env::var_os(ENV_PLUGIN_EXTRA_DIRS)
            .map(|v| {
                env::split_paths(&v)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        extra.extend(self.plugin_extra_dirs());
        PluginDirs::new(extra, &self.dir)
    }
}

fn expand_home(dir: &str) -> PathBuf {
    if let Some(rest) = dir.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(dir)
}

/// Ordered plugin search directories, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDirs {
    dirs: Vec<PathBuf>,
}

impl PluginDirs {
    /// Extra directories, then `<config_dir>/cli-plugins`, then the
    /// platform's system directories.
    pub fn new(extra: Vec<PathBuf>, config_dir: &Path) -> Self {
        let mut dirs = extra;
        dirs.push(config_dir.join(USER_PLUGIN_DIR));
        dirs.extend(system_plugin_dirs());
        Self { dirs }
    }

    /// Exactly the given directories, in order.
    pub fn from_dirs<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.dirs.iter()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl AsRef<[PathBuf]> for PluginDirs {
    fn as_ref(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl<'a> IntoIterator for &'a PluginDirs {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}

#[cfg(not(windows))]
fn system_plugin_dirs() -> Vec<PathBuf> {
    [
        "/usr/local/lib/docker/cli-plugins",
        "/usr/local/libexec/docker/cli-plugins",
        "/usr/lib/docker/cli-plugins",
        "/usr/libexec/docker/cli-plugins",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

#[cfg(windows)]
fn system_plugin_dirs() -> Vec<PathBuf> {
    let program_data = env::var_os("ProgramData")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"));
    vec![program_data.join("Docker").join("cli-plugins")]
}

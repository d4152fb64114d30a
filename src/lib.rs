//! dockercli - command-line client core with external CLI plugin support

pub mod config;
pub mod error;
pub mod flags;
pub mod plugins;
pub mod sdk;

pub use config::{Config, PluginDirs};
pub use error::{CliError, ErrorKind, PluginError, Result};
pub use flags::ClientOptions;
pub use plugins::{Metadata, Plugin};

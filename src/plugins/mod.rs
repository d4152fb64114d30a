//! CLI plugin discovery and execution
//!
//! A CLI plugin is an executable named `docker-<name>` (`docker-<name>.exe`
//! on Windows) in one of the plugin search directories. Running
//! `docker <name> ...` executes it with the client's original arguments.
//!
//! # Architecture
//!
//! - **candidates**: directory scanning for files following the naming convention
//! - **validate**: the metadata exchange that decides whether a candidate is usable
//! - **manager**: first-match resolution, full listing, and run-command building
//! - **stubs**: inert descriptors for listing plugins in help output
//! - **invocation**: the resolved executable plus its forwarded arguments
//! - **tree**: the builtin-command query used to detect name conflicts
//!
//! # Search order
//!
//! ```text
//! $DOCKER_CLI_PLUGIN_EXTRA_DIRS        (highest priority)
//! cliPluginsExtraDirs in config.json
//! <config dir>/cli-plugins
//! /usr/local/lib/docker/cli-plugins
//! /usr/local/libexec/docker/cli-plugins
//! /usr/lib/docker/cli-plugins
//! /usr/libexec/docker/cli-plugins     (lowest priority)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use dockercli::config::Config;
//! use dockercli::plugins::{list_plugins, plugin_run_command};
//!
//! let config = Config::load(None).unwrap();
//! let dirs = config.plugin_dirs();
//! let builtins = ["version", "plugins", "help"];
//!
//! for plugin in list_plugins(&dirs, &builtins).unwrap() {
//!     println!("{} ({})", plugin.name, plugin.vendor());
//! }
//!
//! let args: Vec<_> = std::env::args_os().skip(1).collect();
//! let code = plugin_run_command("helloworld", &dirs, &builtins, args)
//!     .unwrap()
//!     .run()
//!     .unwrap();
//! std::process::exit(code);
//! ```

pub mod candidates;
pub mod invocation;
mod manager;
pub mod stubs;
pub mod tree;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use candidates::{list_plugin_candidates, Candidates};
pub use invocation::PluginInvocation;
pub use manager::{find_plugin, list_plugins, plugin_run_command};
pub use stubs::{plugin_command_stubs, CommandStub};
pub use tree::CommandTree;
pub use types::{Candidate, Metadata, Plugin};
pub use validate::{is_valid_plugin_name, validate};

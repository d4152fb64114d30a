//! The host command tree as seen by the plugin subsystem.
//!
//! Plugin resolution only needs to ask whether a name is already taken by a
//! builtin command, so the host framework is reduced to [`CommandTree`].

use std::collections::{BTreeSet, HashSet};

/// Builtin command lookup used to detect plugin name conflicts.
#[cfg_attr(test, mockall::automock)]
pub trait CommandTree {
    /// Whether `name` is a registered (builtin) subcommand or alias.
    fn has_command(&self, name: &str) -> bool;
}

/// A `clap` root command: its direct subcommands and their aliases.
impl CommandTree for clap::Command {
    fn has_command(&self, name: &str) -> bool {
        self.get_subcommands()
            .any(|c| c.get_name() == name || c.get_all_aliases().any(|a| a == name))
    }
}

/// The empty tree: nothing conflicts.
impl CommandTree for () {
    fn has_command(&self, _name: &str) -> bool {
        false
    }
}

impl<S: AsRef<str>> CommandTree for [S] {
    fn has_command(&self, name: &str) -> bool {
        self.iter().any(|s| s.as_ref() == name)
    }
}

impl<S: AsRef<str>, const N: usize> CommandTree for [S; N] {
    fn has_command(&self, name: &str) -> bool {
        self.as_slice().has_command(name)
    }
}

impl<S: AsRef<str>> CommandTree for Vec<S> {
    fn has_command(&self, name: &str) -> bool {
        self.as_slice().has_command(name)
    }
}

impl CommandTree for HashSet<String> {
    fn has_command(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl CommandTree for BTreeSet<String> {
    fn has_command(&self, name: &str) -> bool {
        self.contains(name)
    }
}

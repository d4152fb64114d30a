//! Help output for the host client.
//!
//! The top-level help lists builtin commands together with stubs for every
//! valid plugin, each prefixed with a vendor column.

use anyhow::Result;
use clap::Command;

use dockercli::config::PluginDirs;
use dockercli::plugins::{
    list_plugins, plugin_command_stubs, plugin_run_command, CommandStub, CommandTree,
};

use super::plugins::exit_status;
use super::StatusError;

pub(crate) const ROOT_ABOUT: &str = "A self-sufficient runtime for containers";

/// Width of the vendor column, parentheses included.
const VENDOR_WIDTH: usize = 13;

/// Minimum width of the command name column.
const MIN_NAME_PADDING: usize = 11;

/// `docker help [COMMAND...]`.
///
/// Builtins print their own help; a plugin is run with `--help` appended.
pub(crate) fn cmd_help(topic: &[String], dirs: &PluginDirs, tree: &Command) -> Result<u8> {
    let Some((name, rest)) = topic.split_first() else {
        print!("{}", root_help(tree, dirs)?);
        return Ok(0);
    };

    if tree.has_command(name) {
        if !rest.is_empty() {
            return Err(unknown_topic(rest).into());
        }
        let mut root = tree.clone();
        root.build();
        if let Some(sub) = root.find_subcommand_mut(name) {
            print!("{}", sub.render_help());
        }
        return Ok(0);
    }

    let args = topic
        .iter()
        .map(String::as_str)
        .chain(std::iter::once("--help"));
    match plugin_run_command(name, dirs, tree, args) {
        Ok(invocation) => Ok(exit_status(invocation.run()?)),
        Err(e) if e.is_not_found() => Err(unknown_topic(topic).into()),
        Err(e) => Err(e.into()),
    }
}

fn unknown_topic(args: &[String]) -> StatusError {
    StatusError::new(format!("unknown help topic: {}", args.join(" ")), 1)
}

/// Top-level help with stubs for the valid plugins in `dirs`.
pub(crate) fn root_help(tree: &Command, dirs: &PluginDirs) -> Result<String> {
    let plugins = list_plugins(dirs, tree)?;
    let stubs = plugin_command_stubs(&plugins, false);
    Ok(render_root_help(tree, &stubs))
}

struct Entry<'a> {
    name: &'a str,
    vendor: Option<&'a str>,
    short: String,
}

pub(crate) fn render_root_help(tree: &Command, stubs: &[CommandStub]) -> String {
    let mut entries: Vec<Entry<'_>> = tree
        .get_subcommands()
        .filter(|c| !c.is_hide_set() && c.get_name() != "help")
        .map(|c| Entry {
            name: c.get_name(),
            vendor: None,
            short: c.get_about().map(|a| a.to_string()).unwrap_or_default(),
        })
        .collect();
    entries.extend(stubs.iter().map(|s| Entry {
        name: &s.name,
        vendor: Some(s.vendor()),
        short: s.short.clone(),
    }));
    entries.sort_by(|a, b| a.name.cmp(b.name));

    let padding = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_PADDING);

    let mut out = format!("Usage:\t{} [OPTIONS] COMMAND\n\n", tree.get_name());
    out.push_str(&tree.get_about().map(|a| a.to_string()).unwrap_or_default());
    out.push('\n');

    let options = render_options(tree);
    if !options.is_empty() {
        out.push_str("\nOptions:\n");
        out.push_str(&options);
    }

    if !entries.is_empty() {
        out.push_str("\nCommands:\n");
        for entry in &entries {
            let line = format!(
                "  {:<padding$} {} {}",
                entry.name,
                command_vendor(entry.vendor),
                entry.short,
                padding = padding
            );
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "\nRun '{} COMMAND --help' for more information on a command.\n",
        tree.get_name()
    ));
    out
}

/// The vendor column: `(<vendor>)` padded to [`VENDOR_WIDTH`], or blanks
/// for builtins. Long vendors are cut with an ellipsis.
pub(crate) fn command_vendor(vendor: Option<&str>) -> String {
    let Some(vendor) = vendor else {
        return " ".repeat(VENDOR_WIDTH);
    };
    let vendor = if vendor.chars().count() > VENDOR_WIDTH - 2 {
        let cut: String = vendor.chars().take(VENDOR_WIDTH - 3).collect();
        format!("{}…", cut)
    } else {
        vendor.to_string()
    };
    format!("{:<width$}", format!("({})", vendor), width = VENDOR_WIDTH)
}

/// Flag listing in the usual `  -x, --long value   help` layout.
fn render_options(cmd: &Command) -> String {
    let rows: Vec<(String, String)> = cmd
        .get_arguments()
        .filter(|a| !a.is_hide_set())
        .filter_map(|arg| {
            let long = arg.get_long()?;
            let mut flag = match arg.get_short() {
                Some(short) => format!("  -{}, --{}", short, long),
                None => format!("      --{}", long),
            };
            if arg.get_action().takes_values() {
                if let Some(name) = arg.get_value_names().and_then(|n| n.first()) {
                    flag.push(' ');
                    flag.push_str(name);
                }
            }

            let mut help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
            if let Some(default) = arg.get_default_values().first() {
                help.push_str(&format!(" (default {:?})", default.to_string_lossy()));
            }
            Some((flag, help))
        })
        .collect();

    let width = rows.iter().map(|(f, _)| f.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(flag, help)| format!("{:<width$}   {}\n", flag, help, width = width))
        .collect()
}

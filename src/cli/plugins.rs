//! Plugin commands for the host client.

use std::ffi::OsString;

use anyhow::{Context, Result};
use clap::Command;

use dockercli::config::PluginDirs;
use dockercli::plugins::{list_plugins, plugin_run_command, Plugin};

use super::help::root_help;
use super::StatusError;

/// `docker plugins [--all]`.
pub(crate) fn cmd_plugins(dirs: &PluginDirs, tree: &Command, all: bool) -> Result<u8> {
    let plugins = list_plugins(dirs, tree).context("Failed to list plugins")?;
    print!("{}", render_plugins(&plugins, all));
    Ok(0)
}

/// Plugin table. Invalid plugins and shadowed paths are only shown with
/// `all`.
pub(crate) fn render_plugins(plugins: &[Plugin], all: bool) -> String {
    let rows: Vec<[String; 4]> = plugins
        .iter()
        .filter(|p| all || p.is_valid())
        .map(|p| {
            let description = match &p.err {
                Some(err) => format!("Invalid plugin: {}", err),
                None => p.short_description().to_string(),
            };
            [
                p.name.clone(),
                p.vendor().to_string(),
                p.version().to_string(),
                description,
            ]
        })
        .collect();

    let header = ["NAME", "VENDOR", "VERSION", "DESCRIPTION"];
    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 4]| {
        let line = format!(
            "{:<w0$}   {:<w1$}   {:<w2$}   {}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
        format!("{}\n", line.trim_end())
    };

    let mut out = format_row(header);
    for (plugin, row) in plugins.iter().filter(|p| all || p.is_valid()).zip(&rows) {
        out.push_str(&format_row([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ]));
        if all {
            out.push_str(&format!("  path: {}\n", plugin.path.display()));
            for shadowed in &plugin.shadowed_paths {
                out.push_str(&format!("  shadows: {}\n", shadowed.display()));
            }
        }
    }
    out
}

/// Run the plugin named by the first element of `external` with the
/// original arguments `raw_args`.
pub(crate) fn cmd_run_plugin(
    external: &[OsString],
    raw_args: &[OsString],
    dirs: &PluginDirs,
    tree: &Command,
) -> Result<u8> {
    let Some((name, rest)) = external.split_first() else {
        print!("{}", root_help(tree, dirs)?);
        return Ok(0);
    };
    let name = name.to_string_lossy();

    match plugin_run_command(&name, dirs, tree, raw_args.iter().cloned()) {
        Ok(invocation) => {
            let code = invocation
                .run()
                .with_context(|| format!("Failed to run plugin {}", name))?;
            Ok(exit_status(code))
        }
        Err(err) if err.is_not_found() => {
            // An unknown command asking for help gets the top-level help
            if rest.iter().any(|a| a == "--help" || a == "-h") {
                print!("{}", root_help(tree, dirs)?);
                return Ok(0);
            }
            Err(StatusError::not_a_command(&name).into())
        }
        Err(err) => Err(err.into()),
    }
}

/// Process exit status for a plugin exit code.
pub(crate) fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

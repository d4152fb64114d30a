//! Plugin resolution
//!
//! Turns a requested subcommand name into a [`Plugin`] using a first-match
//! policy over the search directories, lists every discoverable plugin for
//! help output, and builds the invocation that runs a plugin.

use std::ffi::OsString;
use std::fs;
use std::io;

use tracing::trace;

use crate::config::PluginDirs;
use crate::error::PluginError;

use super::candidates::{absolute, is_dir_following_links, list_plugin_candidates};
use super::invocation::PluginInvocation;
use super::tree::CommandTree;
use super::types::{executable_name, Candidate, Plugin};
use super::validate::{is_valid_plugin_name, validate};

/// Find the plugin called `name`.
///
/// The first directory containing `docker-<name>` wins and only that
/// candidate is validated, even if validation fails: a broken plugin in a
/// higher-priority directory shadows a working one further down. With
/// `include_shadowed`, the remaining directories are still checked and
/// their matches recorded in `shadowed_paths`.
///
/// # Errors
/// - `PluginError::NotFound` if `name` is not a valid plugin name (the
///   filesystem is not consulted) or no directory contains the executable
/// - any error constructing the first candidate, unchanged
pub fn find_plugin<T: CommandTree + ?Sized>(
    name: &str,
    dirs: &PluginDirs,
    tree: &T,
    include_shadowed: bool,
) -> Result<Plugin, PluginError> {
    if !is_valid_plugin_name(name) {
        // Reported as "not found" so callers take their unknown-command path.
        return Err(PluginError::NotFound(name.to_string()));
    }

    let exename = executable_name(name);
    let mut plugin: Option<Plugin> = None;

    for dir in dirs {
        let path = absolute(&dir.join(&exename));

        // Stat rather than relying on exec's ENOENT, which cannot tell a
        // missing file from a missing interpreter or loader. Broken symlinks
        // are kept so they fail validation like the scanner reports them.
        match fs::symlink_metadata(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            _ if is_dir_following_links(&path) => continue,
            _ => {}
        }

        match plugin.as_mut() {
            None => {
                let candidate = Candidate::new(path)?;
                let found = validate(&candidate, tree);
                if !include_shadowed {
                    return Ok(found);
                }
                plugin = Some(found);
            }
            Some(active) => {
                trace!(plugin = %name, path = %path.display(), "Plugin is shadowed");
                active.shadowed_paths.push(path);
            }
        }
    }

    plugin.ok_or_else(|| PluginError::NotFound(name.to_string()))
}

/// Discover and validate every plugin in `dirs`, sorted by name.
///
/// Invalid plugins are returned with `err` set rather than aborting
/// discovery of the others.
///
/// # Errors
/// `PluginError::Filesystem` if a directory cannot be listed.
pub fn list_plugins<T: CommandTree + ?Sized>(
    dirs: &PluginDirs,
    tree: &T,
) -> Result<Vec<Plugin>, PluginError> {
    let candidates = list_plugin_candidates(dirs.as_slice())?;

    let mut plugins = Vec::with_capacity(candidates.len());
    for (name, paths) in candidates {
        let mut paths = paths.into_iter();
        let Some(first) = paths.next() else {
            continue;
        };

        let mut plugin = validate(&Candidate::new(first)?, tree);
        plugin.shadowed_paths = paths.collect();

        match &plugin.err {
            None => trace!(
                plugin = %name,
                vendor = %plugin.vendor(),
                version = %plugin.version(),
                shadowed = plugin.shadowed_paths.len(),
                "Discovered plugin"
            ),
            Some(err) => trace!(plugin = %name, error = %err, "Discovered invalid plugin"),
        }

        plugins.push(plugin);
    }

    Ok(plugins)
}

/// Build the invocation running plugin `name` with `raw_args`.
///
/// `raw_args` should be the process's original argument vector minus the
/// program name, not what the host's own parser kept, so global options
/// the plugin understands are preserved.
///
/// # Errors
/// `PluginError::NotFound` if no plugin exists or the first candidate is
/// invalid for any reason, so every "cannot run this" case looks the same
/// to the caller.
pub fn plugin_run_command<T, I, S>(
    name: &str,
    dirs: &PluginDirs,
    tree: &T,
    raw_args: I,
) -> Result<PluginInvocation, PluginError>
where
    T: CommandTree + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let plugin = find_plugin(name, dirs, tree, false)?;
    if let Some(err) = &plugin.err {
        trace!(plugin = %name, error = %err, "Refusing to run invalid plugin");
        return Err(PluginError::NotFound(name.to_string()));
    }
    Ok(PluginInvocation::new(plugin.path, raw_args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_name_is_not_found() {
        let dirs = PluginDirs::from_dirs(["/nonexistent"]);
        for name in ["", "UPPER", "../etc/passwd", "a b", "9lives"] {
            let err = find_plugin(name, &dirs, &(), true).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound, "name {:?}", name);
        }
    }

    #[test]
    fn test_missing_everywhere_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let dirs = PluginDirs::from_dirs([tmp.path().to_path_buf(), tmp.path().join("nope")]);

        let err = find_plugin("ghost", &dirs, &(), true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Error: No such CLI plugin: ghost");

        let err = plugin_run_command("ghost", &dirs, &(), Vec::<String>::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_directory_with_plugin_name_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(executable_name("dir"))).unwrap();
        let dirs = PluginDirs::from_dirs([tmp.path()]);

        let err = find_plugin("dir", &dirs, &(), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_list_plugins_empty() {
        let tmp = TempDir::new().unwrap();
        let dirs = PluginDirs::from_dirs([tmp.path().join("missing")]);
        assert!(list_plugins(&dirs, &()).unwrap().is_empty());
    }

    #[cfg(unix)]
    mod exec {
        use super::*;
        use crate::plugins::test_support::{
            exec_lock, failing_plugin, metadata_plugin, raw_output_plugin, write_script,
        };
        use serde_json::json;

        fn three_dirs(tmp: &TempDir) -> (Vec<PathBuf>, PluginDirs) {
            let dirs: Vec<PathBuf> = ["a", "b", "c"].iter().map(|d| tmp.path().join(d)).collect();
            for d in &dirs {
                fs::create_dir(d).unwrap();
            }
            (dirs.clone(), PluginDirs::from_dirs(dirs))
        }

        #[test]
        fn test_first_match_wins_and_rest_are_shadowed() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);

            let meta = json!({"Vendor": "Acme", "Version": "1.0", "ShortDescription": "first"});
            let first = metadata_plugin(&dirs[0], "plugin1", &meta);
            // Lower-priority copies must never be run; they would fail if they were.
            let b = failing_plugin(&dirs[1], "plugin1", 1);
            let c = failing_plugin(&dirs[2], "plugin1", 1);

            let plugin = find_plugin("plugin1", &search, &(), true).unwrap();
            assert!(plugin.err.is_none(), "unexpected error: {:?}", plugin.err);
            assert_eq!(plugin.path, first);
            assert_eq!(plugin.shadowed_paths, vec![b, c]);
            assert_eq!(plugin.short_description(), "first");
            assert!(!plugin.shadowed_paths.contains(&plugin.path));

            let plugin = find_plugin("plugin1", &search, &(), false).unwrap();
            assert_eq!(plugin.path, first);
            assert!(plugin.shadowed_paths.is_empty());
        }

        #[test]
        fn test_invalid_first_candidate_is_not_skipped() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);

            let broken = failing_plugin(&dirs[0], "plugin1", 2);
            let working = metadata_plugin(&dirs[1], "plugin1", &json!({"Vendor": "Acme"}));

            let plugin = find_plugin("plugin1", &search, &(), true).unwrap();
            assert_eq!(plugin.path, broken);
            assert_eq!(plugin.err.as_ref().unwrap().kind(), ErrorKind::InvalidCandidate);
            assert_eq!(plugin.shadowed_paths, vec![working]);

            let err = plugin_run_command("plugin1", &search, &(), ["plugin1"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }

        #[test]
        fn test_run_command_forwards_raw_args() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);
            let path = metadata_plugin(
                &dirs[1],
                "goodbye",
                &json!({"Vendor": "Acme", "Version": "1.0", "ShortDescription": "x"}),
            );

            let raw = ["--config", "/tmp/cfg", "-D", "goodbye", "--flag", "arg"];
            let invocation = plugin_run_command("goodbye", &search, &(), raw).unwrap();
            assert_eq!(invocation.path(), path.as_path());
            let args: Vec<&str> = invocation
                .args()
                .iter()
                .map(|a| a.to_str().unwrap())
                .collect();
            assert_eq!(args, raw);
        }

        #[test]
        fn test_builtin_conflict_is_not_found_for_execution() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);
            let marker = tmp.path().join("ran");
            write_script(
                &dirs[0],
                &executable_name("version"),
                &format!("touch {}", marker.display()),
            );

            let plugin = find_plugin("version", &search, &["version", "help"], false).unwrap();
            assert_eq!(plugin.err.as_ref().unwrap().kind(), ErrorKind::NameConflict);

            let err =
                plugin_run_command("version", &search, &["version"], ["version"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert!(!marker.exists(), "conflicting plugin must not be executed");
        }

        #[test]
        fn test_invalid_name_never_touches_plugin() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);
            let marker = tmp.path().join("ran");
            write_script(
                &dirs[0],
                &executable_name("UPPER"),
                &format!("touch {}", marker.display()),
            );

            let err = plugin_run_command("UPPER", &search, &(), ["UPPER"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert!(!marker.exists());
        }

        #[test]
        fn test_broken_symlink_is_candidate_but_not_runnable() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);
            let link = dirs[0].join(executable_name("broken"));
            std::os::unix::fs::symlink(tmp.path().join("nowhere"), &link).unwrap();

            let listed = list_plugin_candidates(search.as_slice()).unwrap();
            assert_eq!(listed.get("broken"), Some(&vec![link.clone()]));

            let plugin = find_plugin("broken", &search, &(), true).unwrap();
            assert_eq!(plugin.path, link);
            assert_eq!(plugin.err.as_ref().unwrap().kind(), ErrorKind::InvalidCandidate);

            let err = plugin_run_command("broken", &search, &(), ["broken"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }

        #[test]
        fn test_malformed_and_failing_plugins_are_not_runnable() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);
            raw_output_plugin(&dirs[0], "badmeta", "not json at all");
            raw_output_plugin(&dirs[0], "arraymeta", r#"["a","b"]"#);
            failing_plugin(&dirs[0], "exits", 7);

            for name in ["badmeta", "arraymeta", "exits"] {
                let err = plugin_run_command(name, &search, &(), [name]).unwrap_err();
                assert_eq!(err.kind(), ErrorKind::NotFound, "{}", name);
                assert_eq!(err.to_string(), format!("Error: No such CLI plugin: {}", name));
            }
        }

        #[test]
        fn test_list_plugins_reports_valid_invalid_and_shadowed() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);

            metadata_plugin(
                &dirs[0],
                "helloworld",
                &json!({"Vendor": "Docker Inc.", "Version": "0.1.0", "ShortDescription": "Hello"}),
            );
            let shadowed = metadata_plugin(&dirs[2], "helloworld", &json!({"Vendor": "Other"}));
            raw_output_plugin(&dirs[1], "badmeta", "{");
            metadata_plugin(&dirs[1], "version", &json!({"Vendor": "Sneaky"}));

            let plugins = list_plugins(&search, &["version"]).unwrap();
            let names: Vec<&str> = plugins.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(names, vec!["badmeta", "helloworld", "version"]);

            let badmeta = &plugins[0];
            assert_eq!(badmeta.err.as_ref().unwrap().kind(), ErrorKind::InvalidCandidate);

            let hello = &plugins[1];
            assert!(hello.is_valid());
            assert_eq!(hello.vendor(), "Docker Inc.");
            assert_eq!(hello.shadowed_paths, vec![shadowed]);

            let version = &plugins[2];
            assert_eq!(version.err.as_ref().unwrap().kind(), ErrorKind::NameConflict);
            assert!(version.vendor().is_empty());
        }

        #[test]
        fn test_discovery_is_idempotent() {
            let _guard = exec_lock();
            let tmp = TempDir::new().unwrap();
            let (dirs, search) = three_dirs(&tmp);
            metadata_plugin(&dirs[0], "one", &json!({"Vendor": "A"}));
            metadata_plugin(&dirs[1], "one", &json!({"Vendor": "B"}));
            failing_plugin(&dirs[2], "two", 1);

            let first = list_plugins(&search, &()).unwrap();
            let second = list_plugins(&search, &()).unwrap();
            assert_eq!(first, second);

            let first = find_plugin("one", &search, &(), true).unwrap();
            let second = find_plugin("one", &search, &(), true).unwrap();
            assert_eq!(first, second);
        }
    }
}

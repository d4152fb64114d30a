//! Plugin candidate scanning
//!
//! Walks the plugin search directories and collects every entry following
//! the `docker-<name>` naming convention, grouped by logical name in search
//! order. Nothing is executed here; see [`super::validate`].

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::PluginError;

use super::types::logical_name;

/// Logical plugin name to candidate paths, highest priority first.
pub type Candidates = BTreeMap<String, Vec<PathBuf>>;

/// List plugin candidates across `dirs`.
///
/// For each logical name the returned paths are ordered by directory
/// priority, then lexically within a directory. Entries not following the
/// naming convention are ignored, as are directories (symlinks are
/// followed for that check). A broken symlink is still a candidate.
///
/// Missing directories, and search path entries that are not directories,
/// are skipped.
///
/// # Errors
/// `PluginError::Filesystem` for any other I/O failure while listing a
/// directory (e.g. permission denied).
pub fn list_plugin_candidates<P: AsRef<Path>>(dirs: &[P]) -> Result<Candidates, PluginError> {
    let mut candidates = Candidates::new();
    for dir in dirs {
        add_candidates_from_dir(&mut candidates, dir.as_ref())?;
    }
    Ok(candidates)
}

fn add_candidates_from_dir(candidates: &mut Candidates, dir: &Path) -> Result<(), PluginError> {
    match fs::metadata(dir) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            trace!(dir = %dir.display(), "Plugin directory does not exist, skipping");
            return Ok(());
        }
        Err(e) => return Err(PluginError::filesystem(dir, e)),
        Ok(meta) if !meta.is_dir() => {
            trace!(path = %dir.display(), "Plugin path is not a directory, skipping");
            return Ok(());
        }
        Ok(_) => {}
    }

    let dir = absolute(dir);
    let mut entries = fs::read_dir(&dir)
        .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
        .map_err(|e| PluginError::filesystem(&dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(logical_name) else {
            continue;
        };

        let path = entry.path();
        if is_dir_following_links(&path) {
            trace!(path = %path.display(), "Ignoring directory with plugin prefix");
            continue;
        }

        trace!(plugin = %name, path = %path.display(), "Found plugin candidate");
        candidates.entry(name.to_string()).or_default().push(path);
    }

    Ok(())
}

/// `true` only if `path` resolves to a directory; broken links are not.
pub(crate) fn is_dir_following_links(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Make `path` absolute against the current directory without resolving
/// symlinks.
pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

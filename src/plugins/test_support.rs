//! Shared fixtures for tests that create and execute plugin scripts.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::types::{executable_name, METADATA_SUBCOMMAND_NAME};

static EXEC_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that write executables and then spawn them, so a
/// concurrent fork never holds a script open for writing (ETXTBSY).
pub(crate) fn exec_lock() -> MutexGuard<'static, ()> {
    EXEC_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write an executable `/bin/sh` script.
#[cfg(unix)]
pub(crate) fn write_script(dir: &Path, file_name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(file_name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A plugin named `name` answering the metadata exchange with `metadata`
/// and printing `ran <args>` otherwise.
#[cfg(unix)]
pub(crate) fn metadata_plugin(dir: &Path, name: &str, metadata: &Value) -> PathBuf {
    let body = format!(
        "if [ \"$1\" = \"{}\" ]; then\n  cat <<'EOF'\n{}\nEOF\n  exit 0\nfi\necho \"ran $*\"",
        METADATA_SUBCOMMAND_NAME, metadata
    );
    write_script(dir, &executable_name(name), &body)
}

/// A plugin that exits with `code` for every invocation.
#[cfg(unix)]
pub(crate) fn failing_plugin(dir: &Path, name: &str, code: i32) -> PathBuf {
    write_script(
        dir,
        &executable_name(name),
        &format!("echo 'no metadata for you' >&2\nexit {}", code),
    )
}

/// A plugin that prints `output` verbatim on the metadata exchange.
#[cfg(unix)]
pub(crate) fn raw_output_plugin(dir: &Path, name: &str, output: &str) -> PathBuf {
    write_script(
        dir,
        &executable_name(name),
        &format!("cat <<'EOF'\n{}\nEOF", output),
    )
}

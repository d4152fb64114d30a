//! Runnable plugin invocations.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::trace;

/// A fully resolved plugin execution: the active executable and the
/// arguments to forward to it verbatim.
///
/// Standard streams and the environment are inherited from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInvocation {
    path: PathBuf,
    args: Vec<OsString>,
}

impl PluginInvocation {
    pub fn new<I, S>(path: impl Into<PathBuf>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            path: path.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// A [`Command`] ready to spawn, wired to the host's standard streams.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.path);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }

    /// Run the plugin to completion and return its exit code.
    ///
    /// # Errors
    /// Any error spawning or waiting for the child.
    pub fn run(&self) -> io::Result<i32> {
        trace!(path = %self.path.display(), args = ?self.args, "Running plugin");
        let status = self.command().status()?;
        let code = exit_code(status);
        trace!(path = %self.path.display(), code, "Plugin exited");
        Ok(code)
    }
}

/// Exit code for `status`, following the shell convention of `128 + N`
/// for a child killed by signal `N`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

//! `git` CLI backend.
//!
//! Every call runs in the directory containing the file so repository
//! discovery behaves as it would for a user in that directory. Paths are
//! passed after `--` so names starting with `-` are never read as options.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::{Confirmation, VcBackend, VcError};

type RevertConfirm = Box<dyn FnMut(&Path) -> bool>;

pub struct GitBackend {
    program: PathBuf,
    confirm_revert: Option<RevertConfirm>,
}

impl Default for GitBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GitBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitBackend")
            .field("program", &self.program)
            .field("confirm_revert", &self.confirm_revert.is_some())
            .finish()
    }
}

impl GitBackend {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
            confirm_revert: None,
        }
    }

    /// Use a specific `git` executable instead of the one on `PATH`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Callback consulted by `revert` under `Confirmation::Ask`. Without one,
    /// an asking revert is declined.
    pub fn with_revert_confirm(mut self, confirm: impl FnMut(&Path) -> bool + 'static) -> Self {
        self.confirm_revert = Some(Box::new(confirm));
        self
    }

    fn run(&self, args: &[&str], paths: &[&Path]) -> Result<Output, VcError> {
        let dir = paths
            .first()
            .and_then(|p| p.parent())
            .filter(|d| !d.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let output = Command::new(&self.program)
            .current_dir(dir)
            .args(args)
            .arg("--")
            .args(paths.iter().map(|p| p.as_os_str()))
            .output()
            .map_err(|source| VcError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;
        tracing::trace!(
            target: "vc.git",
            command = %args.join(" "),
            status = ?output.status.code(),
            "git_run"
        );
        Ok(output)
    }

    /// Whether the index knows `path`. Only a failure to run git is an error.
    fn index_has(&self, path: &Path) -> Result<bool, VcError> {
        let output = self.run(&["ls-files", "--error-unmatch"], &[path])?;
        Ok(output.status.success())
    }

    fn run_checked(&self, args: &[&str], paths: &[&Path]) -> Result<Output, VcError> {
        let output = self.run(args, paths)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(VcError::Command {
                command: args.join(" "),
                path: paths.first().map(|p| p.to_path_buf()).unwrap_or_default(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl VcBackend for GitBackend {
    fn name(&self) -> &'static str {
        "git"
    }

    fn is_tracked(&self, path: &Path) -> bool {
        match self.index_has(path) {
            Ok(tracked) => tracked,
            Err(e) => {
                tracing::debug!(target: "vc.git", error = %e, "tracking_query_failed");
                false
            }
        }
    }

    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), VcError> {
        self.run_checked(&["mv"], &[old, new])?;
        tracing::info!(target: "vc.git", from = %old.display(), to = %new.display(), "git_mv");
        Ok(())
    }

    fn delete(&mut self, path: &Path) -> Result<(), VcError> {
        if !self.index_has(path)? {
            // Left untracked by a revert of a never-committed file.
            std::fs::remove_file(path).map_err(|source| VcError::Remove {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::info!(target: "vc.git", path = %path.display(), "untracked_removed");
            return Ok(());
        }
        self.run_checked(&["rm", "-q", "-f"], &[path])?;
        tracing::info!(target: "vc.git", path = %path.display(), "git_rm");
        Ok(())
    }

    fn is_up_to_date(&self, path: &Path) -> Result<bool, VcError> {
        let output = self.run_checked(&["status", "--porcelain"], &[path])?;
        Ok(output.stdout.iter().all(u8::is_ascii_whitespace))
    }

    fn revert(&mut self, path: &Path, confirmation: Confirmation) -> Result<(), VcError> {
        if confirmation == Confirmation::Ask {
            let confirmed = self.confirm_revert.as_mut().is_some_and(|confirm| confirm(path));
            if !confirmed {
                return Err(VcError::RevertDeclined {
                    path: path.to_path_buf(),
                });
            }
        }
        self.run_checked(&["reset", "-q"], &[path])?;
        // A path staged but never committed is untracked after the reset and
        // has nothing to check out.
        if self.index_has(path)? {
            self.run_checked(&["checkout", "-q"], &[path])?;
        }
        tracing::info!(
            target: "vc.git",
            path = %path.display(),
            auto_confirmed = confirmation == Confirmation::AutoConfirm,
            "git_revert"
        );
        Ok(())
    }
}

//! Version-control backends used by the file commands.
//!
//! The commands only need five questions answered about a path: is it
//! tracked, can it be renamed or deleted through the VCS, is the working copy
//! current, and can it be reverted to repository state. `VcBackend` is that
//! surface. `GitBackend` answers it by driving the `git` executable; `NoVc`
//! tracks nothing and is used when version control is not wanted at all.
//!
//! Reverting normally asks the user before discarding local changes. Callers
//! that have already obtained consent (deleting a file the user confirmed)
//! pass `Confirmation::AutoConfirm` instead of suppressing the prompt some
//! other way.

use std::path::{Path, PathBuf};

mod git;

pub use git::GitBackend;

/// Whether a destructive VC step may ask the user first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Ask,
    AutoConfirm,
}

#[derive(Debug, thiserror::Error)]
pub enum VcError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`git {command}` failed for {}: {stderr}", .path.display())]
    Command {
        command: String,
        path: PathBuf,
        stderr: String,
    },
    #[error("revert of {} was declined", .path.display())]
    RevertDeclined { path: PathBuf },
    #[error("{} is not under version control", .path.display())]
    NotTracked { path: PathBuf },
    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait VcBackend {
    /// Stable human-readable identifier (for logs / diagnostics).
    fn name(&self) -> &'static str;
    fn is_tracked(&self, path: &Path) -> bool;
    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), VcError>;
    fn delete(&mut self, path: &Path) -> Result<(), VcError>;
    /// True when the working copy of `path` matches repository state.
    fn is_up_to_date(&self, path: &Path) -> Result<bool, VcError>;
    fn revert(&mut self, path: &Path, confirmation: Confirmation) -> Result<(), VcError>;
}

impl<T: VcBackend + ?Sized> VcBackend for &mut T {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn is_tracked(&self, path: &Path) -> bool {
        (**self).is_tracked(path)
    }
    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), VcError> {
        (**self).rename(old, new)
    }
    fn delete(&mut self, path: &Path) -> Result<(), VcError> {
        (**self).delete(path)
    }
    fn is_up_to_date(&self, path: &Path) -> Result<bool, VcError> {
        (**self).is_up_to_date(path)
    }
    fn revert(&mut self, path: &Path, confirmation: Confirmation) -> Result<(), VcError> {
        (**self).revert(path, confirmation)
    }
}

/// Backend that tracks nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVc;

impl VcBackend for NoVc {
    fn name(&self) -> &'static str {
        "none"
    }
    fn is_tracked(&self, _path: &Path) -> bool {
        false
    }
    fn rename(&mut self, old: &Path, _new: &Path) -> Result<(), VcError> {
        Err(VcError::NotTracked {
            path: old.to_path_buf(),
        })
    }
    fn delete(&mut self, path: &Path) -> Result<(), VcError> {
        Err(VcError::NotTracked {
            path: path.to_path_buf(),
        })
    }
    fn is_up_to_date(&self, _path: &Path) -> Result<bool, VcError> {
        Ok(true)
    }
    fn revert(&mut self, path: &Path, _confirmation: Confirmation) -> Result<(), VcError> {
        Err(VcError::NotTracked {
            path: path.to_path_buf(),
        })
    }
}

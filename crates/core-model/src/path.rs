//! Canonical path helpers.
//!
//! All view/path identity comparisons go through `canonicalize` so symlinks,
//! `..` components and relative spellings of the same file compare equal.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};

/// Resolve `path` to its absolute, symlink-free form.
///
/// A path that does not exist yet (a rename destination) resolves through its
/// parent directory: the parent is canonicalized and the final component is
/// appended unchanged. The parent itself must exist.
pub fn canonicalize(path: &Path) -> io::Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(p) => Ok(p),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let Some(name) = path.file_name() else {
                return Err(e);
            };
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => std::fs::canonicalize(p)?,
                _ => std::env::current_dir()?,
            };
            Ok(parent.join(name))
        }
        Err(e) => Err(e),
    }
}

/// Like `canonicalize` but never fails: falls back to the lexical absolute
/// path, then to `path` itself. Used when comparing paths of views whose files
/// may already be gone.
pub fn canonicalize_lossy(path: &Path) -> PathBuf {
    canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Final component of `path` as a display string (empty when there is none).
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(OsStr::to_string_lossy)
        .map(|s| s.into_owned())
        .unwrap_or_default()
}

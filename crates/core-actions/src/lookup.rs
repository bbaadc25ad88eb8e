//! View registry lookup: which live views are backed by a given file.
//!
//! Input paths must already be canonical. Each view's effective path (its
//! own for a primary view, its primary's for a secondary view) is
//! canonicalized before comparison, so views opened through a symlink or a
//! relative spelling still match. Nothing here mutates the host.

use std::path::Path;

use core_model::{ViewHost, ViewId, ViewSet, canonicalize_lossy};

fn backed_by<H: ViewHost + ?Sized>(host: &H, id: ViewId, canonical_path: &Path) -> bool {
    host.effective_file(id)
        .is_some_and(|file| canonicalize_lossy(&file) == canonical_path)
}

/// Every live view, primary or secondary, whose canonical effective path is
/// `canonical_path`. Empty when nothing matches.
pub fn find_views<H: ViewHost + ?Sized>(host: &H, canonical_path: &Path) -> ViewSet {
    let set: ViewSet = host
        .live_views()
        .into_iter()
        .filter(|id| backed_by(host, *id, canonical_path))
        .collect();
    tracing::trace!(
        target: "ops.lookup",
        path = %canonical_path.display(),
        matches = set.len(),
        "find_views"
    );
    set
}

/// The live primary view visiting `canonical_path`, if any.
pub fn find_primary<H: ViewHost + ?Sized>(host: &H, canonical_path: &Path) -> Option<ViewId> {
    host.live_views().into_iter().find(|id| {
        host.view(*id).is_some_and(|v| v.is_primary()) && backed_by(host, *id, canonical_path)
    })
}

//! View model shared by the file commands.
//!
//! A `View` is a handle to open, possibly modified content. A view with no
//! `base` is a *primary* view and may visit a file; a view with a `base` is a
//! *secondary* view (a clone or narrowed copy of its primary) and never carries
//! a path of its own. Its effective path is always the primary's path.
//!
//! The host editor owns its views. Everything in `core-actions` goes through
//! the `ViewHost` trait so the commands can run against any editor model; the
//! in-memory `ViewManager` is the implementation used by the `refile` binary
//! and by tests.
//!
//! Invariants (must hold after every public call on a `ViewHost`):
//! * `view(id).base`, when set, names a live primary view (never another
//!   secondary view).
//! * Secondary views have `file_path == None`.
//! * Display names are unique among live views.
//! * Killing a primary view kills every secondary view derived from it.

use std::fmt;
use std::path::{Path, PathBuf};

mod manager;
mod path;

pub use manager::ViewManager;
pub use path::{base_name, canonicalize, canonicalize_lossy};

/// Stable identifier for a `View`. Identifiers are never reused by
/// `ViewManager`, so a stale id simply stops resolving once its view dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub id: ViewId,
    pub name: String,
    pub file_path: Option<PathBuf>,
    pub modified: bool,
    pub base: Option<ViewId>,
}

impl View {
    pub fn is_primary(&self) -> bool {
        self.base.is_none()
    }
}

/// Errors raised by a host while mutating its views.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("no live buffer with id {0}")]
    UnknownView(ViewId),
    #[error("buffer {name} is not visiting a file")]
    NoFile { name: String },
    #[error("buffer {name} is an indirect buffer and cannot visit a file")]
    Secondary { name: String },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Mutation and query surface of the host editor's view table.
///
/// Only `live_views`, `view` and the four mutators are required; path
/// resolution across the derives-from relation is provided.
pub trait ViewHost {
    /// Ids of every live view, in the host's table order.
    fn live_views(&self) -> Vec<ViewId>;
    fn view(&self, id: ViewId) -> Option<&View>;
    /// The view the user is currently looking at, if any.
    fn current_view(&self) -> Option<ViewId>;

    /// Persist unsaved content without prompting. Saving a secondary view
    /// saves its primary.
    fn save(&mut self, id: ViewId) -> Result<(), HostError>;
    /// Re-point a primary view at `path`: its name becomes the base name of
    /// `path` and it is marked unmodified. Nothing is written to disk.
    fn set_visited_file(&mut self, id: ViewId, path: &Path) -> Result<(), HostError>;
    /// Rename a view. Returns the name actually given, which differs from
    /// `name` when another view already uses it.
    fn rename_view(&mut self, id: ViewId, name: &str) -> Result<String, HostError>;
    /// Close a view and release it. Killing a primary view also kills its
    /// secondary views.
    fn kill(&mut self, id: ViewId) -> Result<(), HostError>;

    fn is_live(&self, id: ViewId) -> bool {
        self.view(id).is_some()
    }

    /// Path backing `id`, following the derives-from relation for secondary
    /// views. Not canonicalized.
    fn effective_file(&self, id: ViewId) -> Option<PathBuf> {
        let view = self.view(id)?;
        match view.base {
            Some(base) => self.view(base)?.file_path.clone(),
            None => view.file_path.clone(),
        }
    }
}

/// Unordered collection of views backed by the same canonical path.
///
/// Built fresh for each command; never cached since views come and go at any
/// time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSet {
    ids: Vec<ViewId>,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ViewId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.ids.iter().copied()
    }

    /// Members ordered so every secondary view comes before any primary view.
    /// Ids the host no longer knows sort last.
    pub fn secondaries_first<H: ViewHost + ?Sized>(&self, host: &H) -> Vec<ViewId> {
        let mut ordered = self.ids.clone();
        ordered.sort_by_key(|id| match host.view(*id) {
            Some(v) if !v.is_primary() => 0u8,
            Some(_) => 1,
            None => 2,
        });
        ordered
    }

    /// Display names of the members, for logs and hook environments.
    pub fn names<H: ViewHost + ?Sized>(&self, host: &H) -> Vec<String> {
        self.ids
            .iter()
            .filter_map(|id| host.view(*id).map(|v| v.name.clone()))
            .collect()
    }
}

impl FromIterator<ViewId> for ViewSet {
    fn from_iter<T: IntoIterator<Item = ViewId>>(iter: T) -> Self {
        let mut set = ViewSet::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ViewSet {
    type Item = ViewId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, ViewId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

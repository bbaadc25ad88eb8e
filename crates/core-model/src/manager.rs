//! In-memory view table implementing `ViewHost`.
//!
//! Content lives with the primary view; secondary views read and write
//! through their base. Names follow the usual editor convention: the first
//! view of `report.txt` is `report.txt`, later ones get `report.txt<2>`,
//! `report.txt<3>` and so on.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{HostError, View, ViewHost, ViewId, base_name, canonicalize_lossy};

#[derive(Debug, Default)]
pub struct ViewManager {
    views: Vec<View>,
    contents: HashMap<ViewId, String>,
    current: Option<ViewId>,
    next_id: u64,
}

impl ViewManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit `path`: read it into a new primary view and make it current.
    pub fn open_file(&mut self, path: &Path) -> Result<ViewId, HostError> {
        let text = std::fs::read_to_string(path).map_err(|source| HostError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let path = canonicalize_lossy(path);
        let name = base_name(&path);
        let id = self.insert_view(&name, Some(path.clone()), &text);
        tracing::debug!(target: "model", view = %id, file = %path.display(), "file_visited");
        Ok(id)
    }

    /// Insert a primary view with the given content. `name` is made unique.
    pub fn insert_view(&mut self, name: &str, file_path: Option<PathBuf>, text: &str) -> ViewId {
        let id = self.allocate_id();
        let name = self.unique_name(name, None);
        self.views.push(View {
            id,
            name,
            file_path,
            modified: false,
            base: None,
        });
        self.contents.insert(id, text.to_string());
        self.current = Some(id);
        id
    }

    /// Create a secondary view of `id` (or of `id`'s primary when `id` is
    /// itself secondary). The clone is named after its primary.
    pub fn clone_view(&mut self, id: ViewId) -> Result<ViewId, HostError> {
        let base = self.primary_of(id)?;
        let base_name = self.get(base)?.name.clone();
        let clone = self.allocate_id();
        let name = self.unique_name(&base_name, None);
        self.views.push(View {
            id: clone,
            name,
            file_path: None,
            modified: false,
            base: Some(base),
        });
        Ok(clone)
    }

    /// Replace the content seen through `id` and flag that view modified.
    pub fn edit(&mut self, id: ViewId, text: &str) -> Result<(), HostError> {
        let base = self.primary_of(id)?;
        self.contents.insert(base, text.to_string());
        self.get_mut(id)?.modified = true;
        Ok(())
    }

    pub fn text(&self, id: ViewId) -> Option<&str> {
        let base = self.primary_of(id).ok()?;
        self.contents.get(&base).map(String::as_str)
    }

    pub fn set_current(&mut self, id: ViewId) -> Result<(), HostError> {
        self.get(id)?;
        self.current = Some(id);
        Ok(())
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn find_by_name(&self, name: &str) -> Option<&View> {
        self.views.iter().find(|v| v.name == name)
    }

    fn allocate_id(&mut self) -> ViewId {
        self.next_id += 1;
        ViewId(self.next_id)
    }

    fn get(&self, id: ViewId) -> Result<&View, HostError> {
        self.views
            .iter()
            .find(|v| v.id == id)
            .ok_or(HostError::UnknownView(id))
    }

    fn get_mut(&mut self, id: ViewId) -> Result<&mut View, HostError> {
        self.views
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(HostError::UnknownView(id))
    }

    fn primary_of(&self, id: ViewId) -> Result<ViewId, HostError> {
        let view = self.get(id)?;
        Ok(view.base.unwrap_or(view.id))
    }

    /// `desired`, or `desired<N>` for the smallest N >= 2 not taken by a view
    /// other than `exclude`.
    fn unique_name(&self, desired: &str, exclude: Option<ViewId>) -> String {
        let taken = |candidate: &str| {
            self.views
                .iter()
                .any(|v| Some(v.id) != exclude && v.name == candidate)
        };
        if !taken(desired) {
            return desired.to_string();
        }
        (2u64..)
            .map(|n| format!("{desired}<{n}>"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| desired.to_string())
    }
}

impl ViewHost for ViewManager {
    fn live_views(&self) -> Vec<ViewId> {
        self.views.iter().map(|v| v.id).collect()
    }

    fn view(&self, id: ViewId) -> Option<&View> {
        self.get(id).ok()
    }

    fn current_view(&self) -> Option<ViewId> {
        self.current
    }

    fn save(&mut self, id: ViewId) -> Result<(), HostError> {
        let base = self.primary_of(id)?;
        let primary = self.get(base)?;
        let Some(path) = primary.file_path.clone() else {
            return Err(HostError::NoFile {
                name: primary.name.clone(),
            });
        };
        let text = self.contents.get(&base).cloned().unwrap_or_default();
        std::fs::write(&path, text).map_err(|source| HostError::Write {
            path: path.clone(),
            source,
        })?;
        for view in self
            .views
            .iter_mut()
            .filter(|v| v.id == base || v.base == Some(base))
        {
            view.modified = false;
        }
        tracing::debug!(target: "model", view = %id, file = %path.display(), "view_saved");
        Ok(())
    }

    fn set_visited_file(&mut self, id: ViewId, path: &Path) -> Result<(), HostError> {
        let view = self.get(id)?;
        if !view.is_primary() {
            return Err(HostError::Secondary {
                name: view.name.clone(),
            });
        }
        let name = self.unique_name(&base_name(path), Some(id));
        let view = self.get_mut(id)?;
        view.file_path = Some(path.to_path_buf());
        view.name = name;
        view.modified = false;
        Ok(())
    }

    fn rename_view(&mut self, id: ViewId, name: &str) -> Result<String, HostError> {
        self.get(id)?;
        let name = self.unique_name(name, Some(id));
        self.get_mut(id)?.name = name.clone();
        Ok(name)
    }

    fn kill(&mut self, id: ViewId) -> Result<(), HostError> {
        let view = self.get(id)?;
        let primary = view.is_primary();
        self.views
            .retain(|v| v.id != id && !(primary && v.base == Some(id)));
        if primary {
            self.contents.remove(&id);
        }
        if self.current.is_some_and(|c| !self.views.iter().any(|v| v.id == c)) {
            self.current = self.views.last().map(|v| v.id);
        }
        tracing::debug!(target: "model", view = %id, "view_killed");
        Ok(())
    }
}

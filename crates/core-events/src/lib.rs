//! Lifecycle hooks fired around the file commands.
//!
//! Four hook points exist: before/after rename and before/after delete. Each
//! point owns an ordered list of named callbacks. The registry is an explicit
//! value owned by whoever builds the commands (the binary registers shell
//! hooks from configuration; tests register recorders), so nothing here is
//! process-global.
//!
//! Semantics:
//! * Hooks run synchronously in registration order, receiving the view set
//!   computed before any mutation plus the relevant path(s).
//! * The first hook returning `Err` stops the list; the error propagates to
//!   the command with the hook point and hook name attached as context.
//! * Registering a name that already exists at a point replaces that hook in
//!   place, keeping its position.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use core_model::ViewSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeRename,
    AfterRename,
    BeforeDelete,
    AfterDelete,
}

impl HookPoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            HookPoint::BeforeRename => "before-rename",
            HookPoint::AfterRename => "after-rename",
            HookPoint::BeforeDelete => "before-delete",
            HookPoint::AfterDelete => "after-delete",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments passed to rename hooks.
#[derive(Debug, Clone, Copy)]
pub struct RenameEvent<'a> {
    pub views: &'a ViewSet,
    pub old_path: &'a Path,
    pub new_path: &'a Path,
}

/// Arguments passed to delete hooks.
#[derive(Debug, Clone, Copy)]
pub struct DeleteEvent<'a> {
    pub views: &'a ViewSet,
    pub path: &'a Path,
}

pub type RenameHook = dyn FnMut(&RenameEvent<'_>) -> Result<()>;
pub type DeleteHook = dyn FnMut(&DeleteEvent<'_>) -> Result<()>;

struct NamedHook<F: ?Sized> {
    name: String,
    hook: Box<F>,
}

/// Ordered list of callbacks for one hook point.
pub struct HookList<F: ?Sized> {
    point: HookPoint,
    hooks: Vec<NamedHook<F>>,
}

impl<F: ?Sized> HookList<F> {
    pub fn new(point: HookPoint) -> Self {
        Self {
            point,
            hooks: Vec::new(),
        }
    }

    pub fn point(&self) -> HookPoint {
        self.point
    }

    /// Append `hook` under `name`, or replace the existing hook of that name.
    pub fn add(&mut self, name: impl Into<String>, hook: Box<F>) {
        let name = name.into();
        if let Some(existing) = self.hooks.iter_mut().find(|h| h.name == name) {
            existing.hook = hook;
        } else {
            self.hooks.push(NamedHook { name, hook });
        }
    }

    /// Remove the hook registered under `name`. Returns whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|h| h.name != name);
        self.hooks.len() != before
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|h| h.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    fn run_with(&mut self, mut call: impl FnMut(&mut F) -> Result<()>) -> Result<()> {
        let point = self.point;
        for entry in &mut self.hooks {
            tracing::debug!(
                target: "hooks",
                point = point.as_str(),
                hook = entry.name.as_str(),
                "hook_run"
            );
            call(entry.hook.as_mut())
                .with_context(|| format!("{point} hook `{}` failed", entry.name))?;
        }
        Ok(())
    }
}

impl HookList<RenameHook> {
    pub fn run(&mut self, event: &RenameEvent<'_>) -> Result<()> {
        self.run_with(|hook| hook(event))
    }
}

impl HookList<DeleteHook> {
    pub fn run(&mut self, event: &DeleteEvent<'_>) -> Result<()> {
        self.run_with(|hook| hook(event))
    }
}

/// The four hook lists consulted by the file commands.
pub struct HookRegistry {
    pub before_rename: HookList<RenameHook>,
    pub after_rename: HookList<RenameHook>,
    pub before_delete: HookList<DeleteHook>,
    pub after_delete: HookList<DeleteHook>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            before_rename: HookList::new(HookPoint::BeforeRename),
            after_rename: HookList::new(HookPoint::AfterRename),
            before_delete: HookList::new(HookPoint::BeforeDelete),
            after_delete: HookList::new(HookPoint::AfterDelete),
        }
    }

    pub fn on_before_rename(
        &mut self,
        name: impl Into<String>,
        hook: impl FnMut(&RenameEvent<'_>) -> Result<()> + 'static,
    ) {
        self.before_rename.add(name, Box::new(hook));
    }

    pub fn on_after_rename(
        &mut self,
        name: impl Into<String>,
        hook: impl FnMut(&RenameEvent<'_>) -> Result<()> + 'static,
    ) {
        self.after_rename.add(name, Box::new(hook));
    }

    pub fn on_before_delete(
        &mut self,
        name: impl Into<String>,
        hook: impl FnMut(&DeleteEvent<'_>) -> Result<()> + 'static,
    ) {
        self.before_delete.add(name, Box::new(hook));
    }

    pub fn on_after_delete(
        &mut self,
        name: impl Into<String>,
        hook: impl FnMut(&DeleteEvent<'_>) -> Result<()> + 'static,
    ) {
        self.after_delete.add(name, Box::new(hook));
    }

    /// Total number of registered hooks across all points.
    pub fn len(&self) -> usize {
        self.before_rename.len()
            + self.after_rename.len()
            + self.before_delete.len()
            + self.after_delete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

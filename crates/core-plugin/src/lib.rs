//! Advisory service abstraction.
//!
//! An advisory service is optional per-view tooling attached from outside the
//! editor core: a language server integration, a linter daemon, a diagnostics
//! watcher. The file commands never require one. They only ask, per view,
//! whether a service manages it (`manager_for` returns a handle or `None`) and
//! then stop or restart that management around a rename or delete.
//!
//! Contract:
//! * Absence of a manager is the normal case, not an error.
//! * `shutdown` with `quiet = true` must not surface user-visible warnings.
//! * Errors returned from `shutdown`/`reestablish` are advisory; callers log
//!   and continue. Implementors should still report them rather than panic.

use core_model::View;

/// Opaque token naming the manager (server instance, watcher) of a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManagerHandle(pub String);

pub trait AdvisoryService {
    /// Stable human-readable identifier (for logs / diagnostics).
    fn name(&self) -> &'static str;
    /// Capability query: the manager currently responsible for `view`.
    fn manager_for(&self, view: &View) -> Option<ManagerHandle>;
    /// Stop `handle`. `quiet` suppresses any user-facing notification.
    fn shutdown(&mut self, handle: &ManagerHandle, quiet: bool) -> anyhow::Result<()>;
    /// Attach management to `view` as it is now (after a rename the view
    /// already carries its new path and name).
    fn reestablish(&mut self, view: &View) -> anyhow::Result<()>;

    fn is_managed(&self, view: &View) -> bool {
        self.manager_for(view).is_some()
    }
}

impl<T: AdvisoryService + ?Sized> AdvisoryService for &mut T {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn manager_for(&self, view: &View) -> Option<ManagerHandle> {
        (**self).manager_for(view)
    }
    fn shutdown(&mut self, handle: &ManagerHandle, quiet: bool) -> anyhow::Result<()> {
        (**self).shutdown(handle, quiet)
    }
    fn reestablish(&mut self, view: &View) -> anyhow::Result<()> {
        (**self).reestablish(view)
    }
}

/// Service that manages nothing; used when no integration is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAdvisory;

impl AdvisoryService for NoopAdvisory {
    fn name(&self) -> &'static str {
        "noop-advisory"
    }
    fn manager_for(&self, _view: &View) -> Option<ManagerHandle> {
        None
    }
    fn shutdown(&mut self, _handle: &ManagerHandle, _quiet: bool) -> anyhow::Result<()> {
        Ok(())
    }
    fn reestablish(&mut self, _view: &View) -> anyhow::Result<()> {
        Ok(())
    }
}

#![allow(dead_code)] // Shared across several integration tests; each test binary uses a subset of helpers.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::anyhow;
use core_events::{DeleteEvent, HookRegistry, RenameEvent};
use core_model::{View, ViewId, ViewManager, canonicalize};
use core_plugin::{AdvisoryService, ManagerHandle};
use core_vc::{Confirmation, VcBackend, VcError};
use tempfile::TempDir;

/// Temporary directory plus an in-memory host whose views visit files in it.
pub struct Fixture {
    dir: TempDir,
    root: PathBuf,
    pub host: ViewManager,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = canonicalize(dir.path()).unwrap();
        Self {
            dir,
            root,
            host: ViewManager::new(),
        }
    }

    /// Canonical path of `name` inside the fixture directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Create `name` on disk and visit it in a new primary view.
    pub fn open(&mut self, name: &str, content: &str) -> ViewId {
        let path = self.write(name, content);
        self.host.open_file(&path).unwrap()
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).unwrap()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    pub fn name_of(&self, id: ViewId) -> Option<String> {
        self.host.views().iter().find(|v| v.id == id).map(|v| v.name.clone())
    }
}

/// Ordered log shared by several collaborators, to check the interleaving
/// of their calls.
pub type Journal = Rc<RefCell<Vec<String>>>;

fn note(journal: &Option<Journal>, entry: impl Into<String>) {
    if let Some(journal) = journal {
        journal.borrow_mut().push(entry.into());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcCall {
    Rename(PathBuf, PathBuf),
    Delete(PathBuf),
    Revert(PathBuf, Confirmation),
}

#[derive(Debug, Default)]
pub struct VcState {
    pub tracked: HashSet<PathBuf>,
    pub stale: HashSet<PathBuf>,
    pub calls: Vec<VcCall>,
    pub refuse: bool,
}

/// Scripted VC backend. Tracking and staleness are set up front; mutations
/// are recorded and applied to the real filesystem so the commands observe
/// the same disk state a real backend would leave.
#[derive(Debug, Clone, Default)]
pub struct MockVc {
    pub state: Rc<RefCell<VcState>>,
    journal: Option<Journal>,
}

impl MockVc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(self, path: &Path) -> Self {
        self.state.borrow_mut().tracked.insert(path.to_path_buf());
        self
    }

    pub fn stale(self, path: &Path) -> Self {
        self.state.borrow_mut().stale.insert(path.to_path_buf());
        self
    }

    /// Make every rename and delete fail the way a VCS command would.
    pub fn refusing(self) -> Self {
        self.state.borrow_mut().refuse = true;
        self
    }

    /// Also note every call, queries included, in `journal` as `vc:<call>`.
    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    pub fn calls(&self) -> Vec<VcCall> {
        self.state.borrow().calls.clone()
    }
}

fn refused(command: &str, path: &Path) -> VcError {
    VcError::Command {
        command: command.into(),
        path: path.to_path_buf(),
        stderr: "fatal: refused by test backend".into(),
    }
}

impl VcBackend for MockVc {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_tracked(&self, path: &Path) -> bool {
        note(&self.journal, "vc:is_tracked");
        self.state.borrow().tracked.contains(path)
    }

    fn rename(&mut self, old: &Path, new: &Path) -> Result<(), VcError> {
        note(&self.journal, "vc:rename");
        let mut state = self.state.borrow_mut();
        state.calls.push(VcCall::Rename(old.to_path_buf(), new.to_path_buf()));
        if state.refuse {
            return Err(refused("mv", old));
        }
        std::fs::rename(old, new).map_err(|e| VcError::Command {
            command: "mv".into(),
            path: old.to_path_buf(),
            stderr: e.to_string(),
        })?;
        state.tracked.remove(old);
        state.tracked.insert(new.to_path_buf());
        Ok(())
    }

    fn delete(&mut self, path: &Path) -> Result<(), VcError> {
        note(&self.journal, "vc:delete");
        let mut state = self.state.borrow_mut();
        state.calls.push(VcCall::Delete(path.to_path_buf()));
        if state.refuse {
            return Err(refused("rm", path));
        }
        std::fs::remove_file(path).map_err(|e| VcError::Command {
            command: "rm".into(),
            path: path.to_path_buf(),
            stderr: e.to_string(),
        })?;
        state.tracked.remove(path);
        Ok(())
    }

    fn is_up_to_date(&self, path: &Path) -> Result<bool, VcError> {
        note(&self.journal, "vc:is_up_to_date");
        Ok(!self.state.borrow().stale.contains(path))
    }

    fn revert(&mut self, path: &Path, confirmation: Confirmation) -> Result<(), VcError> {
        note(&self.journal, "vc:revert");
        let mut state = self.state.borrow_mut();
        state
            .calls
            .push(VcCall::Revert(path.to_path_buf(), confirmation));
        if confirmation == Confirmation::Ask {
            return Err(VcError::RevertDeclined {
                path: path.to_path_buf(),
            });
        }
        state.stale.remove(path);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryCall {
    Shutdown { handle: String, quiet: bool },
    Reestablish { name: String, file: Option<PathBuf> },
}

#[derive(Debug, Default)]
pub struct AdvisoryState {
    pub calls: Vec<AdvisoryCall>,
}

/// Advisory service managing every file-backed primary view, or only the
/// views visiting one path. Either call can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct MockAdvisory {
    pub state: Rc<RefCell<AdvisoryState>>,
    only: Option<PathBuf>,
    fail_shutdown: bool,
    fail_reestablish: bool,
    journal: Option<Journal>,
}

impl MockAdvisory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manage only views whose visited file is exactly `path`.
    pub fn managing_only(mut self, path: &Path) -> Self {
        self.only = Some(path.to_path_buf());
        self
    }

    /// Also note every call in `journal` as `advisory:<call> <subject>`.
    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    pub fn failing_shutdown(mut self) -> Self {
        self.fail_shutdown = true;
        self
    }

    pub fn failing_reestablish(mut self) -> Self {
        self.fail_reestablish = true;
        self
    }

    pub fn calls(&self) -> Vec<AdvisoryCall> {
        self.state.borrow().calls.clone()
    }
}

impl AdvisoryService for MockAdvisory {
    fn name(&self) -> &'static str {
        "mock-advisory"
    }

    fn manager_for(&self, view: &View) -> Option<ManagerHandle> {
        let file = view.file_path.as_ref()?;
        if self.only.as_ref().is_some_and(|only| only != file) {
            return None;
        }
        Some(ManagerHandle(format!("server:{}", view.name)))
    }

    fn shutdown(&mut self, handle: &ManagerHandle, quiet: bool) -> anyhow::Result<()> {
        note(&self.journal, format!("advisory:shutdown {}", handle.0));
        self.state.borrow_mut().calls.push(AdvisoryCall::Shutdown {
            handle: handle.0.clone(),
            quiet,
        });
        if self.fail_shutdown {
            return Err(anyhow!("server did not answer shutdown"));
        }
        Ok(())
    }

    fn reestablish(&mut self, view: &View) -> anyhow::Result<()> {
        note(&self.journal, format!("advisory:reestablish {}", view.name));
        self.state.borrow_mut().calls.push(AdvisoryCall::Reestablish {
            name: view.name.clone(),
            file: view.file_path.clone(),
        });
        if self.fail_reestablish {
            return Err(anyhow!("server failed to start"));
        }
        Ok(())
    }
}

/// One recorded hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCall {
    pub point: &'static str,
    pub views: Vec<ViewId>,
    pub paths: Vec<PathBuf>,
}

pub type HookLog = Rc<RefCell<Vec<HookCall>>>;

fn rename_recorder(
    log: &HookLog,
    point: &'static str,
) -> impl FnMut(&RenameEvent<'_>) -> anyhow::Result<()> + 'static {
    let log = log.clone();
    move |ev| {
        log.borrow_mut().push(HookCall {
            point,
            views: ev.views.iter().collect(),
            paths: vec![ev.old_path.to_path_buf(), ev.new_path.to_path_buf()],
        });
        Ok(())
    }
}

fn delete_recorder(
    log: &HookLog,
    point: &'static str,
) -> impl FnMut(&DeleteEvent<'_>) -> anyhow::Result<()> + 'static {
    let log = log.clone();
    move |ev| {
        log.borrow_mut().push(HookCall {
            point,
            views: ev.views.iter().collect(),
            paths: vec![ev.path.to_path_buf()],
        });
        Ok(())
    }
}

/// Registry with a recorder at each of the four hook points.
pub fn recording_hooks() -> (HookRegistry, HookLog) {
    let log: HookLog = Rc::default();
    let mut hooks = HookRegistry::new();
    hooks.on_before_rename("recorder", rename_recorder(&log, "before-rename"));
    hooks.on_after_rename("recorder", rename_recorder(&log, "after-rename"));
    hooks.on_before_delete("recorder", delete_recorder(&log, "before-delete"));
    hooks.on_after_delete("recorder", delete_recorder(&log, "after-delete"));
    (hooks, log)
}

/// Recorded calls at `point`.
pub fn calls_at(log: &HookLog, point: &str) -> Vec<HookCall> {
    log.borrow()
        .iter()
        .filter(|c| c.point == point)
        .cloned()
        .collect()
}

/// Sorted copy, for comparing view sets irrespective of order.
pub fn sorted(mut ids: Vec<ViewId>) -> Vec<ViewId> {
    ids.sort();
    ids
}

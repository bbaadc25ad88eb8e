//! File commands: rename the file behind a view, delete it with all its views.
//!
//! Both commands share the same shape:
//!
//! 1. resolve the target view (default: the host's current view) and its
//!    canonical backing path, failing early with a `FileOpError` when a
//!    precondition does not hold;
//! 2. ask the user (`UserInterface`) for the new name or for confirmation; an
//!    unchanged name, a cancelled prompt or a declined confirmation ends the
//!    command quietly with nothing touched;
//! 3. collect the view set for the path (`lookup::find_views`) *before*
//!    mutating anything, and hand that same set to every hook;
//! 4. run the before hooks, mutate disk (plain filesystem or version control),
//!    fix up the views, then run the after hooks.
//!
//! Once disk mutation starts there is no rollback. A failure part way through
//! (destination exists, VCS refuses) surfaces as-is and leaves earlier steps
//! (such as a save) applied.
//!
//! Advisory services (language servers and similar) are stopped and restarted
//! on a best-effort basis: their failures are logged on the `advisory` target
//! and never abort a command.

use core_config::Config;
use core_events::HookRegistry;
use core_model::{ViewHost, ViewId};
use core_plugin::{AdvisoryService, NoopAdvisory};
use core_vc::{NoVc, VcBackend};

mod advisory;
mod delete;
mod error;
pub mod lookup;
mod rename;
mod ui;

pub use delete::DeleteOutcome;
pub use error::FileOpError;
pub use lookup::{find_primary, find_views};
pub use rename::RenameOutcome;
pub use ui::{ScriptedUi, UserInterface};

/// The rename/delete commands together with the collaborators they drive.
pub struct FileCommands {
    config: Config,
    hooks: HookRegistry,
    vc: Box<dyn VcBackend>,
    advisory: Box<dyn AdvisoryService>,
}

impl FileCommands {
    /// Commands with no version control backend and no advisory service.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            hooks: HookRegistry::new(),
            vc: Box::new(NoVc),
            advisory: Box::new(NoopAdvisory),
        }
    }

    pub fn with_vc(mut self, vc: impl VcBackend + 'static) -> Self {
        self.vc = Box::new(vc);
        self
    }

    pub fn with_advisory(mut self, advisory: impl AdvisoryService + 'static) -> Self {
        self.advisory = Box::new(advisory);
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn vc_name(&self) -> &'static str {
        self.vc.name()
    }

    /// True when `path` should go through the VC backend rather than the
    /// plain filesystem.
    fn delegates_to_vc(&self, path: &std::path::Path) -> bool {
        self.config.use_version_control() && self.vc.is_tracked(path)
    }
}

fn resolve_target<H: ViewHost + ?Sized>(
    host: &H,
    view: Option<ViewId>,
) -> Result<ViewId, FileOpError> {
    view.or_else(|| host.current_view())
        .ok_or(FileOpError::NoActiveView)
}

//! Delete the file visited by a view and close every view of it.
//!
//! Views are closed before the file goes away so none of them ever visits a
//! missing file. Whether the file is tracked is decided before any view is
//! closed; some hosts can only answer that with a view open.

use std::path::PathBuf;

use core_events::DeleteEvent;
use core_model::{ViewHost, ViewId, base_name, canonicalize_lossy};
use core_vc::Confirmation;

use crate::lookup::find_views;
use crate::{FileCommands, FileOpError, UserInterface, advisory, resolve_target};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { path: PathBuf, views_closed: usize },
    /// The user answered no at the confirmation prompt.
    Declined,
}

impl FileCommands {
    /// Delete the file visited by `view` (default: the current view) and kill
    /// all of its views, `view` included.
    pub fn delete<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        ui: &mut dyn UserInterface,
        view: Option<ViewId>,
    ) -> Result<DeleteOutcome, FileOpError> {
        let id = resolve_target(&*host, view)?;
        let name = host
            .view(id)
            .map(|v| v.name.clone())
            .ok_or(FileOpError::ViewNotLive(id))?;
        let file = host
            .effective_file(id)
            .ok_or(FileOpError::NotVisiting { name })?;
        let path = canonicalize_lossy(&file);

        let prompt = format!(
            "Really delete {} and kill all its buffers? ",
            base_name(&path)
        );
        if !ui.confirm(&prompt) {
            tracing::debug!(target: "ops.delete", file = %path.display(), "delete_declined");
            return Ok(DeleteOutcome::Declined);
        }

        let via_vc = self.delegates_to_vc(&path);
        let views = find_views(&*host, &path);
        for member in &views {
            if host.view(member).is_some_and(|v| v.modified) {
                host.save(member)?;
            }
        }

        let event = DeleteEvent {
            views: &views,
            path: &path,
        };
        self.hooks.before_delete.run(&event).map_err(FileOpError::Hook)?;

        let mut views_closed = 0;
        for member in views.secondaries_first(&*host) {
            if !host.is_live(member) {
                continue;
            }
            advisory::stop_quietly(self.advisory.as_mut(), &*host, member);
            host.kill(member)?;
            views_closed += 1;
        }

        if path.symlink_metadata().is_ok() {
            if via_vc {
                if !self.vc.is_up_to_date(&path)? {
                    self.vc.revert(&path, Confirmation::AutoConfirm)?;
                }
                self.vc.delete(&path)?;
            } else {
                std::fs::remove_file(&path).map_err(|source| FileOpError::Delete {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        self.hooks.after_delete.run(&event).map_err(FileOpError::Hook)?;

        tracing::info!(
            target: "ops.delete",
            path = %path.display(),
            views_closed,
            vc = via_vc,
            "file_deleted"
        );
        if self.config.verbose() {
            ui.message(&format!("Deleted {}", path.display()));
        }
        Ok(DeleteOutcome::Deleted { path, views_closed })
    }
}

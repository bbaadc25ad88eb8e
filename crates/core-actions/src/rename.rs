//! Rename the file visited by a view.
//!
//! Sequence (each numbered step is observable by hooks or tests):
//! 1. preconditions: the view is file backed, the file exists as a regular
//!    file, a live primary view visits it;
//! 2. save the primary view when modified;
//! 3. prompt for the new name (pre-filled with the current one); unchanged or
//!    cancelled ends here with no hook fired;
//! 4. compute the new canonical path in the old directory and the view set of
//!    the old path;
//! 5. before-rename hooks;
//! 6. note which advisory manager handles each view, then move the file (VCS
//!    when enabled and tracked, else a plain rename that refuses to overwrite);
//! 7. re-point the primary view, rename secondary views, then stop the noted
//!    managers and re-establish management of the renamed views;
//! 8. after-rename hooks.

use std::path::{Path, PathBuf};

use core_events::RenameEvent;
use core_model::{ViewHost, ViewId, ViewSet, base_name, canonicalize, canonicalize_lossy};

use crate::lookup::{find_primary, find_views};
use crate::{FileCommands, FileOpError, UserInterface, advisory, resolve_target};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed { from: PathBuf, to: PathBuf },
    /// The user kept the current name.
    Unchanged,
    /// The user cancelled the name prompt.
    Cancelled,
}

impl FileCommands {
    /// Rename the file visited by `view` (default: the current view).
    pub fn rename<H: ViewHost + ?Sized>(
        &mut self,
        host: &mut H,
        ui: &mut dyn UserInterface,
        view: Option<ViewId>,
    ) -> Result<RenameOutcome, FileOpError> {
        let id = resolve_target(&*host, view)?;
        let name = host
            .view(id)
            .map(|v| v.name.clone())
            .ok_or(FileOpError::ViewNotLive(id))?;
        let file = host
            .effective_file(id)
            .ok_or(FileOpError::NotFileBacked { name })?;
        let old_path = match canonicalize(&file) {
            Ok(p) if p.is_file() => p,
            _ => return Err(FileOpError::FileMissing(file)),
        };
        let primary = find_primary(&*host, &old_path)
            .ok_or_else(|| FileOpError::PrimaryNotFound(old_path.clone()))?;

        if host.view(primary).is_some_and(|v| v.modified) {
            host.save(primary)?;
        }

        let old_name = base_name(&old_path);
        let prompt = format!("Rename {old_name} to: ");
        let Some(new_name) = ui.read_file_name(&prompt, &old_name) else {
            tracing::debug!(target: "ops.rename", file = %old_path.display(), "rename_cancelled");
            return Ok(RenameOutcome::Cancelled);
        };
        if new_name == old_name {
            tracing::debug!(target: "ops.rename", file = %old_path.display(), "rename_unchanged");
            return Ok(RenameOutcome::Unchanged);
        }
        if new_name.is_empty() {
            return Err(FileOpError::EmptyName);
        }
        let dir = old_path.parent().unwrap_or_else(|| Path::new("/"));
        let requested = dir.join(&new_name);
        let new_path = canonicalize(&requested).map_err(|source| FileOpError::Rename {
            from: old_path.clone(),
            to: requested,
            source,
        })?;
        if new_path == old_path {
            return Ok(RenameOutcome::Unchanged);
        }

        let views = find_views(&*host, &old_path);
        let event = RenameEvent {
            views: &views,
            old_path: &old_path,
            new_path: &new_path,
        };
        self.hooks.before_rename.run(&event).map_err(FileOpError::Hook)?;

        // Managers are keyed by the identity the views have before the move.
        let managed = advisory::managers(&*self.advisory, &*host, &views);
        let via_vc = self.move_file(&old_path, &new_path)?;
        host.set_visited_file(primary, &new_path)?;
        rename_secondaries(host, &views, &old_name, &new_path)?;
        advisory::restart(self.advisory.as_mut(), &*host, managed);

        self.hooks.after_rename.run(&event).map_err(FileOpError::Hook)?;

        tracing::info!(
            target: "ops.rename",
            from = %old_path.display(),
            to = %new_path.display(),
            views = views.len(),
            vc = via_vc,
            "file_renamed"
        );
        if self.config.verbose() {
            ui.message(&format!(
                "Renamed {} to {}",
                old_path.display(),
                new_path.display()
            ));
        }
        Ok(RenameOutcome::Renamed {
            from: old_path,
            to: new_path,
        })
    }

    /// Physically move `old` to `new`. Returns whether the VC backend did it.
    fn move_file(&mut self, old: &Path, new: &Path) -> Result<bool, FileOpError> {
        if new.symlink_metadata().is_ok() {
            return Err(FileOpError::DestinationExists(new.to_path_buf()));
        }
        if self.delegates_to_vc(old) {
            self.vc.rename(old, new)?;
            return Ok(true);
        }
        std::fs::rename(old, new).map_err(|source| FileOpError::Rename {
            from: old.to_path_buf(),
            to: new.to_path_buf(),
            source,
        })?;
        Ok(false)
    }
}

/// Give every secondary view of the renamed file a name derived from the new
/// base name, keeping whatever followed the old base name (`<2>`, narrowing
/// markers). Names that never started with the old base name are left alone.
fn rename_secondaries<H: ViewHost + ?Sized>(
    host: &mut H,
    views: &ViewSet,
    old_name: &str,
    new_path: &Path,
) -> Result<(), FileOpError> {
    let new_name = base_name(new_path);
    for id in views {
        let Some(view) = host.view(id) else { continue };
        if view.is_primary() {
            continue;
        }
        let follows = host
            .effective_file(id)
            .is_some_and(|f| canonicalize_lossy(&f) == new_path);
        if !follows {
            continue;
        }
        let Some(suffix) = view.name.strip_prefix(old_name) else {
            tracing::debug!(target: "ops.rename", view = %view.name, "secondary_name_kept");
            continue;
        };
        let renamed = format!("{new_name}{suffix}");
        host.rename_view(id, &renamed)?;
    }
    Ok(())
}

//! Best-effort stop/restart of advisory services around the file commands.

use core_model::{ViewHost, ViewId, ViewSet};
use core_plugin::{AdvisoryService, ManagerHandle};

/// Managers of the members of `views`, looked up while the views still carry
/// their current path and name.
pub(crate) fn managers<H: ViewHost + ?Sized>(
    advisory: &dyn AdvisoryService,
    host: &H,
    views: &ViewSet,
) -> Vec<(ViewId, ManagerHandle)> {
    views
        .iter()
        .filter_map(|id| {
            let view = host.view(id)?;
            advisory.manager_for(view).map(|handle| (id, handle))
        })
        .collect()
}

fn shutdown(advisory: &mut dyn AdvisoryService, handle: &ManagerHandle) {
    if let Err(e) = advisory.shutdown(handle, true) {
        tracing::warn!(
            target: "advisory",
            service = advisory.name(),
            manager = %handle.0,
            error = %e,
            "advisory_shutdown_failed"
        );
    }
}

/// Quietly shut down whatever manages `id`. Returns whether a manager was
/// found. Failures are logged, never returned.
pub(crate) fn stop_quietly<H: ViewHost + ?Sized>(
    advisory: &mut dyn AdvisoryService,
    host: &H,
    id: ViewId,
) -> bool {
    let Some(handle) = host.view(id).and_then(|v| advisory.manager_for(v)) else {
        return false;
    };
    shutdown(advisory, &handle);
    true
}

/// Shut down each previously captured manager, then re-establish management
/// of its view, which by now carries its new identity.
pub(crate) fn restart<H: ViewHost + ?Sized>(
    advisory: &mut dyn AdvisoryService,
    host: &H,
    managed: Vec<(ViewId, ManagerHandle)>,
) {
    for (id, handle) in managed {
        shutdown(advisory, &handle);
        let Some(view) = host.view(id) else {
            continue;
        };
        match advisory.reestablish(view) {
            Ok(()) => tracing::debug!(
                target: "advisory",
                service = advisory.name(),
                view = %view.name,
                "advisory_reestablished"
            ),
            Err(e) => tracing::warn!(
                target: "advisory",
                service = advisory.name(),
                view = %view.name,
                error = %e,
                "advisory_reestablish_failed"
            ),
        }
    }
}

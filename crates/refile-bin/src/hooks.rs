//! Shell commands from `[hooks]` registered as lifecycle hooks.
//!
//! Each command runs through `sh -c` with the event in its environment:
//! `REFILE_HOOK` (hook point), `REFILE_OLD_PATH`/`REFILE_NEW_PATH` for rename,
//! `REFILE_PATH` for delete, and `REFILE_VIEWS` (comma-separated view names as
//! they were before the command). A non-zero exit status fails the hook.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use core_config::HooksConfig;
use core_events::{DeleteEvent, HookPoint, HookRegistry, RenameEvent};
use core_model::{ViewId, ViewSet};

type ViewNames = Rc<HashMap<ViewId, String>>;

/// Register every configured command, in file order, under the name
/// `config:<index>`.
pub fn register(registry: &mut HookRegistry, config: &HooksConfig, names: ViewNames) {
    for (i, command) in config.before_rename.iter().enumerate() {
        let hook = rename_hook(HookPoint::BeforeRename, command, &names);
        registry.on_before_rename(format!("config:{i}"), hook);
    }
    for (i, command) in config.after_rename.iter().enumerate() {
        let hook = rename_hook(HookPoint::AfterRename, command, &names);
        registry.on_after_rename(format!("config:{i}"), hook);
    }
    for (i, command) in config.before_delete.iter().enumerate() {
        let hook = delete_hook(HookPoint::BeforeDelete, command, &names);
        registry.on_before_delete(format!("config:{i}"), hook);
    }
    for (i, command) in config.after_delete.iter().enumerate() {
        let hook = delete_hook(HookPoint::AfterDelete, command, &names);
        registry.on_after_delete(format!("config:{i}"), hook);
    }
}

fn rename_hook(
    point: HookPoint,
    command: &str,
    names: &ViewNames,
) -> impl FnMut(&RenameEvent<'_>) -> Result<()> + 'static {
    let command = command.to_string();
    let names = names.clone();
    move |ev| {
        run_shell(
            point,
            &command,
            &[
                ("REFILE_OLD_PATH", ev.old_path),
                ("REFILE_NEW_PATH", ev.new_path),
            ],
            &view_list(ev.views, &names),
        )
    }
}

fn delete_hook(
    point: HookPoint,
    command: &str,
    names: &ViewNames,
) -> impl FnMut(&DeleteEvent<'_>) -> Result<()> + 'static {
    let command = command.to_string();
    let names = names.clone();
    move |ev| {
        run_shell(
            point,
            &command,
            &[("REFILE_PATH", ev.path)],
            &view_list(ev.views, &names),
        )
    }
}

fn view_list(views: &ViewSet, names: &HashMap<ViewId, String>) -> String {
    views
        .iter()
        .filter_map(|id| names.get(&id).map(String::as_str))
        .collect::<Vec<_>>()
        .join(",")
}

fn run_shell(point: HookPoint, command: &str, paths: &[(&str, &Path)], views: &str) -> Result<()> {
    tracing::debug!(target: "hooks", hook = %point, command, "shell_hook_start");
    let status = Command::new("sh")
        .arg("-c")
        .arg(command)
        .env("REFILE_HOOK", point.as_str())
        .env("REFILE_VIEWS", views)
        .envs(paths.iter().map(|(k, v)| (*k, v.as_os_str())))
        .status()
        .with_context(|| format!("failed to run `{command}`"))?;
    if !status.success() {
        bail!("`{command}` exited with {status}");
    }
    Ok(())
}

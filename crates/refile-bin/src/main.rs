//! refile entrypoint.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Once;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use core_actions::{DeleteOutcome, FileCommands, RenameOutcome};
use core_events::HookRegistry;
use core_model::ViewManager;
use core_plugin::NoopAdvisory;
use core_vc::GitBackend;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod hooks;
mod terminal;

use terminal::TerminalUi;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "refile",
    version,
    about = "Rename or delete a file together with every view open on it"
)]
struct Args {
    /// Configuration file path (overrides discovery of `refile.toml`).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,
    /// Write logs to this file instead of stderr.
    #[arg(long = "log", global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rename FILE in place (same directory).
    Rename {
        file: PathBuf,
        /// New base name; prompts on stdin when omitted.
        #[arg(long)]
        to: Option<String>,
        /// Number of secondary views to open on FILE before renaming.
        #[arg(long, default_value_t = 0)]
        clones: usize,
    },
    /// Delete FILE and close its views.
    Delete {
        file: PathBuf,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
        #[arg(long, default_value_t = 0)]
        clones: usize,
    },
}

impl Command {
    fn target(&self) -> (&Path, usize) {
        match self {
            Command::Rename { file, clones, .. } | Command::Delete { file, clones, .. } => {
                (file, *clones)
            }
        }
    }
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self, log: Option<&Path>) -> Result<()> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let Some(path) = log else {
            // A subscriber may already be installed (tests); keep it.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            return Ok(());
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .ok_or_else(|| anyhow!("log path {} has no file name", path.display()))?;
        let file_appender = tracing_appender::rolling::never(dir, file_name);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Open `file` as the primary view plus `clones` secondary views of it.
fn open_views(file: &Path, clones: usize) -> Result<ViewManager> {
    let mut host = ViewManager::new();
    let primary = host
        .open_file(file)
        .with_context(|| format!("cannot open {}", file.display()))?;
    for _ in 0..clones {
        host.clone_view(primary)?;
    }
    host.set_current(primary)?;
    Ok(host)
}

fn run(args: Args) -> Result<()> {
    let config = core_config::load_from(args.config.clone())?;
    let (file, clones) = args.command.target();
    let mut host = open_views(file, clones)?;

    let names: HashMap<_, _> = host
        .views()
        .iter()
        .map(|v| (v.id, v.name.clone()))
        .collect();
    let mut registry = HookRegistry::new();
    hooks::register(&mut registry, &config.file.hooks, Rc::new(names));

    info!(
        target: "runtime",
        file = %file.display(),
        clones,
        hooks = registry.len(),
        use_version_control = config.use_version_control(),
        "startup"
    );

    let mut commands = FileCommands::new(config)
        .with_vc(GitBackend::new())
        .with_advisory(NoopAdvisory)
        .with_hooks(registry);

    match &args.command {
        Command::Rename { to, .. } => {
            let mut ui = TerminalUi::stdio().with_name(to.clone());
            let outcome = commands.rename(&mut host, &mut ui, None)?;
            if !matches!(outcome, RenameOutcome::Renamed { .. }) {
                info!(target: "runtime", ?outcome, "rename_skipped");
            }
        }
        Command::Delete { yes, .. } => {
            let mut ui = TerminalUi::stdio().assume_yes(*yes);
            let outcome = commands.delete(&mut host, &mut ui, None)?;
            if outcome == DeleteOutcome::Declined {
                info!(target: "runtime", "delete_declined");
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    startup.configure_logging(args.log.as_deref())?;
    AppStartup::install_panic_hook();
    let result = run(args);
    if let Err(e) = &result {
        tracing::error!(target: "runtime", error = %format!("{e:#}"), "command_failed");
    }
    result
}

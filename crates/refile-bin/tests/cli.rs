// End-to-end runs of the `refile` binary against files in a temp directory.
// Version control is switched off through the config file so the runs do not
// depend on where the temp directory lives.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("refile.toml"), config).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, body: &str) -> PathBuf {
        let p = self.path(name);
        std::fs::write(&p, body).unwrap();
        p
    }

    fn refile(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_refile"))
            .arg("--config")
            .arg(self.path("refile.toml"))
            .args(args)
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .stdin(Stdio::null())
            .output()
            .unwrap()
    }
}

fn arg(p: &Path) -> &str {
    p.to_str().unwrap()
}

const QUIET: &str = "[files]\nuse_version_control = false\n";
const VERBOSE: &str = "[files]\nuse_version_control = false\nverbose = true\n";

#[test]
fn rename_with_preset_name_moves_the_file() {
    let ws = Workspace::new(VERBOSE);
    let file = ws.write("report.txt", "numbers");

    let out = ws.refile(&["rename", arg(&file), "--to", "final.txt", "--clones", "1"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(!file.exists());
    assert_eq!(std::fs::read_to_string(ws.path("final.txt")).unwrap(), "numbers");
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("Renamed "), "{stdout}");
    assert!(stdout.contains("final.txt"), "{stdout}");
}

#[test]
fn rename_onto_an_existing_file_fails() {
    let ws = Workspace::new(QUIET);
    let file = ws.write("report.txt", "mine");
    ws.write("taken.txt", "theirs");

    let out = ws.refile(&["rename", arg(&file), "--to", "taken.txt"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "mine");
}

#[test]
fn delete_with_yes_removes_the_file() {
    let ws = Workspace::new(QUIET);
    let file = ws.write("notes.txt", "x");

    let out = ws.refile(&["delete", arg(&file), "--yes", "--clones", "2"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(!file.exists());
}

#[test]
fn delete_without_an_answer_keeps_the_file() {
    let ws = Workspace::new(QUIET);
    let file = ws.write("notes.txt", "x");

    let out = ws.refile(&["delete", arg(&file)]);

    assert!(out.status.success());
    assert!(file.exists());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Really delete notes.txt"));
}

#[test]
fn missing_file_exits_with_an_error() {
    let ws = Workspace::new(QUIET);
    let out = ws.refile(&["delete", arg(&ws.path("absent.txt")), "--yes"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot open"));
}

#[cfg(unix)]
#[test]
fn configured_hooks_run_around_the_command() {
    let log = tempfile::NamedTempFile::new().unwrap();
    let config = format!(
        "[files]\nuse_version_control = false\n[hooks]\nbefore_delete = [\"echo \\\"$REFILE_HOOK $REFILE_VIEWS\\\" >> '{0}'\"]\nafter_delete = [\"echo \\\"$REFILE_HOOK\\\" >> '{0}'\"]\n",
        log.path().display()
    );
    let ws = Workspace::new(&config);
    let file = ws.write("notes.txt", "x");

    let out = ws.refile(&["delete", arg(&file), "--yes", "--clones", "1"]);

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let lines = std::fs::read_to_string(log.path()).unwrap();
    assert_eq!(lines, "before-delete notes.txt,notes.txt<2>\nafter-delete\n");
}

#[cfg(unix)]
#[test]
fn failing_before_hook_leaves_the_file() {
    let ws = Workspace::new("[files]\nuse_version_control = false\n[hooks]\nbefore_rename = [\"exit 1\"]\n");
    let file = ws.write("report.txt", "x");

    let out = ws.refile(&["rename", arg(&file), "--to", "final.txt"]);

    assert!(!out.status.success());
    assert!(file.exists());
    assert!(!ws.path("final.txt").exists());
    assert!(String::from_utf8_lossy(&out.stderr).contains("before-rename hook `config:0` failed"));
}

#[test]
fn log_flag_writes_to_the_given_file() {
    let ws = Workspace::new(QUIET);
    let file = ws.write("notes.txt", "x");
    let log = ws.path("refile.log");

    let out = Command::new(env!("CARGO_BIN_EXE_refile"))
        .arg("--config")
        .arg(ws.path("refile.toml"))
        .arg("--log")
        .arg(&log)
        .args(["delete", arg(&file), "--yes"])
        .env("RUST_LOG", "info")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(out.status.success());
    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("file_deleted"), "{text}");
}

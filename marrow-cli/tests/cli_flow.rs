use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn marrow_cmd(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("marrow"));
    cmd.current_dir(root);
    cmd
}

fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, contents).expect("write");
}

fn init_workspace(root: &Path) {
    marrow_cmd(root).arg("init").assert().success();
}

#[test]
fn init_tracks_sources_and_refuses_to_rerun() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "src/user.service.ts", "export class UserService {}");

    marrow_cmd(ws.path())
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialized").and(contains("1 source file(s) tracked")));

    assert!(ws.path().join(".marrow/index.json").is_file());
    assert!(ws.path().join(".marrow/config.json").is_file());
    assert!(ws.path().join(".marrow/skeleton-prompt.txt").is_file());
    let gitignore = fs::read_to_string(ws.path().join(".gitignore")).expect("gitignore");
    assert!(gitignore.lines().any(|line| line == ".marrow/"));

    marrow_cmd(ws.path())
        .arg("init")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("already initialized"));
}

#[test]
fn commands_require_init() {
    let ws = TempDir::new().expect("tempdir");
    marrow_cmd(ws.path())
        .arg("sync")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("marrow init"));
}

#[test]
fn sync_reports_added_and_deleted_files() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "a.ts", "const a = 1;");
    init_workspace(ws.path());

    write_file(ws.path(), "b.ts", "const b = 2;");
    marrow_cmd(ws.path())
        .args(["sync", "--full", "--verbose"])
        .assert()
        .success()
        .stdout(contains("1 added").and(contains("b.ts")));

    fs::remove_file(ws.path().join("b.ts")).expect("rm");
    marrow_cmd(ws.path())
        .args(["sync", "--full"])
        .assert()
        .success()
        .stdout(contains("1 deleted"));
}

#[test]
fn status_json_exposes_the_index() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "src/user.controller.ts", "export class UserController {}");
    init_workspace(ws.path());

    marrow_cmd(ws.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(
            contains("\"promptVersion\"")
                .and(contains("src/user.controller.ts"))
                .and(contains("\"controller\"")),
        );
}

#[test]
fn generate_writes_prompt_and_marks_pending() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "src/user.service.ts", "export class UserService {}");
    init_workspace(ws.path());

    marrow_cmd(ws.path())
        .args(["generate", "--filter", "missing", "-o", "prompt.md"])
        .assert()
        .success();

    let prompt = fs::read_to_string(ws.path().join("prompt.md")).expect("prompt");
    assert!(prompt.contains("### src/user.service.ts"));
    assert!(prompt.contains("export class UserService {}"));
    assert!(prompt.contains(".marrow/skeletons/src/user.service.skeleton.ts"));

    marrow_cmd(ws.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(contains("pendingGeneration"));
}

#[test]
fn generate_rejects_untracked_files_and_empty_selections() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "a.ts", "const a = 1;");
    init_workspace(ws.path());

    marrow_cmd(ws.path())
        .args(["generate", "--files", "nope.ts"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("not tracked"));

    marrow_cmd(ws.path())
        .args(["generate", "--files", "a.ts", "--filter", "stale"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("outside --filter"));

    marrow_cmd(ws.path())
        .args(["generate", "--filter", "stale"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("no tracked files match"));
}

#[test]
fn pipeline_syncs_then_builds_the_prompt() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "a.ts", "const a = 1;");
    init_workspace(ws.path());

    // A file added after init must be picked up by the sync step and
    // land in the prompt the generate step writes.
    write_file(ws.path(), "src/user.service.ts", "export class UserService {}");
    marrow_cmd(ws.path())
        .args(["pipeline", "--full", "-o", "prompt.md"])
        .assert()
        .success()
        .stdout(contains("1 added"));

    let prompt = fs::read_to_string(ws.path().join("prompt.md")).expect("prompt");
    assert!(prompt.contains("### src/user.service.ts"));
    assert!(prompt.contains("### a.ts"));

    marrow_cmd(ws.path())
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(contains("pendingGeneration"));
}

#[test]
fn validate_strict_fails_on_unrepaired_drift() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "a.ts", "const a = 1;");
    init_workspace(ws.path());

    write_file(ws.path(), "a.ts", "const a = 2;");
    marrow_cmd(ws.path())
        .args(["validate", "--strict"])
        .assert()
        .failure()
        .code(4)
        .stderr(contains("unresolved"));

    marrow_cmd(ws.path())
        .args(["validate", "--fix", "--strict"])
        .assert()
        .success();
}

#[test]
fn rebuild_requires_confirmation() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "a.ts", "const a = 1;");
    init_workspace(ws.path());

    marrow_cmd(ws.path())
        .arg("rebuild")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("--confirm"));

    marrow_cmd(ws.path())
        .args(["rebuild", "--confirm"])
        .assert()
        .success()
        .stdout(contains("Rebuilt index"));
}

#[test]
fn export_bundles_only_confirmed_skeletons() {
    let ws = TempDir::new().expect("tempdir");
    write_file(ws.path(), "src/user.service.ts", "export class UserService {}");
    init_workspace(ws.path());

    // Nothing current yet.
    marrow_cmd(ws.path())
        .arg("export")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("no current skeletons"));

    marrow_cmd(ws.path())
        .args(["generate", "-o", "prompt.md"])
        .assert()
        .success();
    write_file(
        ws.path(),
        ".marrow/skeletons/src/user.service.skeleton.ts",
        "class UserService",
    );
    marrow_cmd(ws.path()).args(["validate", "--fix"]).assert().success();

    marrow_cmd(ws.path())
        .args(["export", "-o", "skeletons.md"])
        .assert()
        .success();
    let export = fs::read_to_string(ws.path().join("skeletons.md")).expect("export");
    assert!(export.contains("## src/user.service.ts"));
    assert!(export.contains("class UserService"));

    marrow_cmd(ws.path())
        .args(["export", "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"skeletonPath\""));
}

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

use common::{SkillFixture, read_installed, source_with_default_skill, stage_override, write_skill};

fn sko(templates: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("sko").unwrap();
    cmd.env("SKO_TEMPLATES", templates).arg("--quiet");
    cmd
}

#[test]
fn cli_help() {
    let mut cmd = Command::cargo_bin("sko").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn cli_version() {
    let mut cmd = Command::cargo_bin("sko").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn list_shows_table_and_total() {
    let source = source_with_default_skill();
    sko(source.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("Total: 1 skills"));
}

#[test]
fn list_robot_emits_json() {
    let source = source_with_default_skill();
    let output = sko(source.path())
        .args(["--robot", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["id"], "demo");
    assert_eq!(json[0]["type"], "concrete");
}

#[test]
fn show_unknown_skill_fails() {
    let source = source_with_default_skill();
    sko(source.path())
        .args(["show", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn validate_accepts_well_formed_registry() {
    let source = tempdir().unwrap();
    write_skill(
        source.path(),
        &SkillFixture {
            id: "base",
            ..SkillFixture::default()
        },
    );
    write_skill(
        source.path(),
        &SkillFixture {
            id: "extra",
            depends_on: &["base"],
            ..SkillFixture::default()
        },
    );

    sko(source.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: 2 skill(s) valid"));
}

#[test]
fn validate_rejects_dependency_cycle() {
    let source = tempdir().unwrap();
    for (id, dep) in [("a", "b"), ("b", "c"), ("c", "a")] {
        write_skill(
            source.path(),
            &SkillFixture {
                id,
                depends_on: &[dep],
                ..SkillFixture::default()
            },
        );
    }

    sko(source.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("circular dependency"));
}

#[test]
fn validate_rejects_dangling_reference() {
    let source = tempdir().unwrap();
    write_skill(
        source.path(),
        &SkillFixture {
            id: "lonely",
            depends_on: &["missing"],
            ..SkillFixture::default()
        },
    );

    sko(source.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn install_copies_tree_and_records_state() {
    let source = source_with_default_skill();
    let repo = tempdir().unwrap();

    sko(source.path())
        .args(["install", "demo", "--root"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed skill"));

    assert_eq!(read_installed(repo.path(), ".claude/CLAUDE.md"), "# Title\nbase\n");

    let marker: Value =
        serde_json::from_str(&read_installed(repo.path(), ".claude/skill.json")).unwrap();
    assert_eq!(marker["id"], "demo");

    let state: Value =
        serde_json::from_str(&read_installed(repo.path(), ".sko/installed.json")).unwrap();
    assert_eq!(state["skills"][0]["id"], "demo");
    assert_eq!(state["skills"][0]["has_overrides"], false);
}

#[test]
fn install_refuses_existing_tree_without_force() {
    let source = source_with_default_skill();
    let repo = tempdir().unwrap();
    std::fs::create_dir_all(repo.path().join(".claude")).unwrap();

    sko(source.path())
        .args(["install", "demo", "--root"])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn install_warns_on_file_conflicts() {
    let source = tempdir().unwrap();
    write_skill(
        source.path(),
        &SkillFixture {
            id: "first",
            ..SkillFixture::default()
        },
    );
    write_skill(
        source.path(),
        &SkillFixture {
            id: "second",
            ..SkillFixture::default()
        },
    );
    let repo = tempdir().unwrap();

    sko(source.path())
        .args(["install", "first", "--root"])
        .arg(repo.path())
        .assert()
        .success();

    // Same manifest: the second install overlaps but still succeeds.
    sko(source.path())
        .args(["install", "second", "--force", "--root"])
        .arg(repo.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("conflicts detected"))
        .stderr(predicate::str::contains(".claude/CLAUDE.md"));
}

#[test]
fn install_applies_section_override() {
    let source = tempdir().unwrap();
    write_skill(
        source.path(),
        &SkillFixture {
            id: "demo",
            override_paths: &[".claude/CLAUDE.md#repo-specific-rules"],
            files: &[(
                ".claude/CLAUDE.md",
                "# Title\n## Repo-Specific Rules\nbase rules\n## Other\nkeep this\n",
            )],
            ..SkillFixture::default()
        },
    );
    let repo = tempdir().unwrap();
    stage_override(repo.path(), "demo", "CLAUDE.md", "override rules");

    sko(source.path())
        .args(["install", "demo", "--root"])
        .arg(repo.path())
        .assert()
        .success();

    let result = read_installed(repo.path(), ".claude/CLAUDE.md");
    assert!(result.contains("override rules"));
    assert!(result.contains("keep this"));
    assert!(!result.contains("base rules"));

    let state: Value =
        serde_json::from_str(&read_installed(repo.path(), ".sko/installed.json")).unwrap();
    assert_eq!(state["skills"][0]["has_overrides"], true);
}

#[test]
fn install_warns_on_undeclared_override() {
    let source = source_with_default_skill();
    let repo = tempdir().unwrap();
    stage_override(repo.path(), "demo", "CLAUDE.md", "should not land");

    sko(source.path())
        .args(["install", "demo", "--root"])
        .arg(repo.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("not in override_paths"));

    assert_eq!(read_installed(repo.path(), ".claude/CLAUDE.md"), "# Title\nbase\n");
}

#[test]
fn sync_reinstalls_base_and_reapplies_overrides() {
    let source = tempdir().unwrap();
    write_skill(
        source.path(),
        &SkillFixture {
            id: "demo",
            override_paths: &[".claude/CLAUDE.md#repo-specific-rules"],
            files: &[(
                ".claude/CLAUDE.md",
                "# Title\n## Repo-Specific Rules\nbase rules\n## Other\nkeep this\n",
            )],
            ..SkillFixture::default()
        },
    );
    let repo = tempdir().unwrap();
    stage_override(repo.path(), "demo", "CLAUDE.md", "override rules");

    sko(source.path())
        .args(["install", "demo", "--root"])
        .arg(repo.path())
        .assert()
        .success();
    let first = read_installed(repo.path(), ".claude/CLAUDE.md");

    // Simulate local drift; sync must rebuild from the pristine base.
    std::fs::write(repo.path().join(".claude/CLAUDE.md"), "drifted").unwrap();

    sko(source.path())
        .args(["sync", "--root"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Synced skill"));

    let second = read_installed(repo.path(), ".claude/CLAUDE.md");
    assert_eq!(first, second);
}

#[test]
fn sync_without_marker_or_state_fails() {
    let source = source_with_default_skill();
    let repo = tempdir().unwrap();

    sko(source.path())
        .args(["sync", "--root"])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to determine installed skill"));
}

#[test]
fn override_command_lists_targets() {
    let source = tempdir().unwrap();
    write_skill(
        source.path(),
        &SkillFixture {
            id: "demo",
            override_paths: &[".claude/CLAUDE.md#repo-specific-rules"],
            files: &[(
                ".claude/CLAUDE.md",
                "# Title\n## Repo-Specific Rules\nbase rules\n",
            )],
            ..SkillFixture::default()
        },
    );

    sko(source.path())
        .args(["override", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".claude/CLAUDE.md#repo-specific-rules"));
}

#[test]
fn override_command_seeds_from_base_section() {
    let source = tempdir().unwrap();
    write_skill(
        source.path(),
        &SkillFixture {
            id: "demo",
            override_paths: &[".claude/CLAUDE.md#repo-specific-rules"],
            files: &[(
                ".claude/CLAUDE.md",
                "# Title\n## Repo-Specific Rules\nbase rules\n## Other\nkeep this\n",
            )],
            ..SkillFixture::default()
        },
    );
    let repo = tempdir().unwrap();

    sko(source.path())
        .args(["override", "demo", "--path", ".claude/CLAUDE.md#repo-specific-rules", "--root"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created override at"));

    let staged = read_installed(repo.path(), ".sko/overrides/demo/CLAUDE.md");
    assert_eq!(staged, "base rules");

    // Without --force a second run refuses to clobber the staged file.
    sko(source.path())
        .args(["override", "demo", "--path", ".claude/CLAUDE.md#repo-specific-rules", "--root"])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn override_command_rejects_undeclared_path() {
    let source = source_with_default_skill();
    let repo = tempdir().unwrap();

    sko(source.path())
        .args(["override", "demo", "--path", ".claude/CLAUDE.md", "--root"])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not in override_paths"));
}

#[test]
fn status_reports_installed_skills() {
    let source = source_with_default_skill();
    let repo = tempdir().unwrap();

    sko(source.path())
        .args(["status", "--root"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No skills installed"));

    sko(source.path())
        .args(["install", "demo", "--root"])
        .arg(repo.path())
        .assert()
        .success();

    let output = sko(source.path())
        .args(["--robot", "status", "--root"])
        .arg(repo.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["skills"][0]["id"], "demo");
}

#[test]
fn robot_error_output_is_json() {
    let source = source_with_default_skill();
    let output = sko(source.path())
        .args(["--robot", "show", "ghost"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"], true);
    assert_eq!(json["code"], "skill_not_found");
}

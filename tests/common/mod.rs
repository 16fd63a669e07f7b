//! Common test utilities shared across integration tests.
//!
//! Builds throwaway package sources and target repositories on disk so
//! tests can drive the binary end to end.

use std::path::{Path, PathBuf};

pub struct SkillFixture<'a> {
    pub id: &'a str,
    pub depends_on: &'a [&'a str],
    pub override_paths: &'a [&'a str],
    /// `(path-under-skill-dir, content)` template files.
    pub files: &'a [(&'a str, &'a str)],
}

impl Default for SkillFixture<'_> {
    fn default() -> Self {
        Self {
            id: "demo",
            depends_on: &[],
            override_paths: &[],
            files: &[(".claude/CLAUDE.md", "# Title\nbase\n")],
        }
    }
}

/// Write one skill directory (descriptor plus template files) into the
/// package source.
pub fn write_skill(source_root: &Path, fixture: &SkillFixture) {
    let dir = source_root.join(fixture.id);
    std::fs::create_dir_all(&dir).unwrap();

    let deps: Vec<String> = fixture
        .depends_on
        .iter()
        .map(|d| format!("\"{d}\""))
        .collect();
    let overrides: Vec<String> = fixture
        .override_paths
        .iter()
        .map(|p| format!("\"{p}\""))
        .collect();

    let descriptor = format!(
        r#"{{
  "id": "{id}",
  "name": "{id}",
  "type": "concrete",
  "version": "1.0.0",
  "description": "Fixture skill {id}",
  "tags": ["fixture"],
  "repo_types": ["generic"],
  "author": "tests",
  "depends_on": [{deps}],
  "override_paths": [{overrides}]
}}"#,
        id = fixture.id,
        deps = deps.join(", "),
        overrides = overrides.join(", ")
    );
    std::fs::write(dir.join("skill.json"), descriptor).unwrap();

    for (rel, content) in fixture.files {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

/// A package source populated with a single default skill.
pub fn source_with_default_skill() -> tempfile::TempDir {
    let source = tempfile::tempdir().unwrap();
    write_skill(source.path(), &SkillFixture::default());
    source
}

/// Stage an override file for a skill inside a target repository.
pub fn stage_override(repo: &Path, skill: &str, rel: &str, content: &str) {
    let path: PathBuf = repo.join(".sko/overrides").join(skill).join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn read_installed(repo: &Path, rel: &str) -> String {
    std::fs::read_to_string(repo.join(rel)).unwrap()
}

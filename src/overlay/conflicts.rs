use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Result, SkoError};

use super::{TEMPLATE_ROOT, to_slash};

/// A file overlap between an installed skill and one about to be installed.
/// Advisory only; the caller decides whether to proceed.
#[derive(Debug, Clone, Serialize)]
pub struct Conflict {
    pub path: String,
    pub existing_skill: String,
    pub new_skill: String,
    pub severity: String,
}

/// Compare the new skill's manifest against the union of files installed by
/// `installed` skills. First skill in the list wins owner attribution for a
/// shared path. Output is sorted by path.
pub fn detect_conflicts(
    source_root: &Path,
    installed: &[String],
    new_skill: &str,
) -> Result<Vec<Conflict>> {
    if new_skill.is_empty() {
        return Err(SkoError::Config("new skill is required".to_string()));
    }

    let mut owners: HashMap<String, &str> = HashMap::new();
    for skill in installed {
        for file in list_skill_files(source_root, skill)? {
            owners.entry(file).or_insert(skill.as_str());
        }
    }

    let mut conflicts = Vec::new();
    for file in list_skill_files(source_root, new_skill)? {
        if let Some(owner) = owners.get(&file) {
            conflicts.push(Conflict {
                path: file,
                existing_skill: (*owner).to_string(),
                new_skill: new_skill.to_string(),
                severity: "warn".to_string(),
            });
        }
    }

    // list_skill_files is sorted, so conflicts already are; keep the
    // guarantee explicit.
    conflicts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(conflicts)
}

/// Every non-directory path under a skill's template tree, rendered
/// relative to the skill directory (`.claude/...`), sorted.
pub fn list_skill_files(source_root: &Path, skill: &str) -> Result<Vec<String>> {
    let skill_dir = source_root.join(skill);
    let tree = skill_dir.join(TEMPLATE_ROOT);
    if !tree.is_dir() {
        return Err(SkoError::SkillNotFound(skill.to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&tree) {
        let entry =
            entry.map_err(|err| SkoError::Config(format!("walk {}: {err}", tree.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(&skill_dir)
            .map_err(|err| SkoError::Config(format!("{}: {err}", skill_dir.display())))?;
        files.push(to_slash(rel));
    }

    files.sort();
    Ok(files)
}

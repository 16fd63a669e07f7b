use std::path::Path;

use crate::error::{Result, SkoError};

use super::types::SkillDescriptor;

/// Read and parse `<skill_dir>/skill.json` from the package source.
///
/// Performs required-field checks only; cross-skill validation belongs to
/// the registry validator.
pub fn load_descriptor(source_root: &Path, skill_dir: &str) -> Result<SkillDescriptor> {
    let meta_path = source_root.join(skill_dir).join("skill.json");
    let raw = std::fs::read_to_string(&meta_path)
        .map_err(|err| SkoError::Metadata(format!("read {}: {err}", meta_path.display())))?;

    let meta: SkillDescriptor = serde_json::from_str(&raw)
        .map_err(|err| SkoError::Metadata(format!("parse {}: {err}", meta_path.display())))?;

    check_required(&meta, &meta_path)?;
    Ok(meta)
}

fn check_required(meta: &SkillDescriptor, meta_path: &Path) -> Result<()> {
    let missing = |field: &str| {
        SkoError::Metadata(format!("{}: {field} is required", meta_path.display()))
    };

    if meta.id.is_empty() {
        return Err(missing("id"));
    }
    if meta.name.is_empty() {
        return Err(missing("name"));
    }
    if meta.version.is_empty() {
        return Err(missing("version"));
    }
    if meta.description.is_empty() {
        return Err(missing("description"));
    }
    if meta.repo_kinds.is_empty() {
        return Err(missing("repo_types"));
    }
    Ok(())
}

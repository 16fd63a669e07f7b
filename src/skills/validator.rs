use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SkoError};

use super::metadata::load_descriptor;
use super::registry::SkillRegistry;
use super::types::SkillDescriptor;

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9-]+$").expect("id pattern"));

/// Validate a single skill: descriptor schema, id/directory agreement, and
/// the required template file.
pub fn validate_skill(source_root: &Path, skill_dir: &str) -> Result<()> {
    let meta = load_descriptor(source_root, skill_dir)?;
    validate_descriptor(&meta)?;

    if meta.id != skill_dir {
        return Err(SkoError::SchemaValidation(format!(
            "skill id {:?} does not match directory name {skill_dir:?}",
            meta.id
        )));
    }

    let required = source_root.join(skill_dir).join(".claude/CLAUDE.md");
    if !required.is_file() {
        return Err(SkoError::SchemaValidation(format!(
            "required file .claude/CLAUDE.md not found for skill {:?}",
            meta.id
        )));
    }

    Ok(())
}

/// Schema rules for a loaded descriptor: id/tag patterns, semver version,
/// and reference id shapes. Enum fields are enforced at parse time.
pub fn validate_descriptor(meta: &SkillDescriptor) -> Result<()> {
    if !ID_PATTERN.is_match(&meta.id) {
        return Err(SkoError::SchemaValidation(format!(
            "id {:?} must match ^[a-z0-9-]+$",
            meta.id
        )));
    }
    if meta.id.len() > 64 {
        return Err(SkoError::SchemaValidation(
            "id length must be between 1 and 64 characters".to_string(),
        ));
    }

    if semver::Version::parse(&meta.version).is_err() {
        return Err(SkoError::SchemaValidation(format!(
            "invalid semver version: {}",
            meta.version
        )));
    }

    for tag in &meta.tags {
        if !ID_PATTERN.is_match(tag) {
            return Err(SkoError::SchemaValidation(format!(
                "tag {tag:?} must match ^[a-z0-9-]+$"
            )));
        }
    }
    for dep in meta.depends_on.iter().chain(&meta.conflicts_with) {
        if !ID_PATTERN.is_match(dep) {
            return Err(SkoError::SchemaValidation(format!(
                "referenced id {dep:?} must match ^[a-z0-9-]+$"
            )));
        }
    }

    Ok(())
}

/// Validate a built registry: duplicate identities, dangling references,
/// and dependency cycles. Returns the first structured error; never
/// attempts partial repair.
pub fn validate_registry(reg: &SkillRegistry) -> Result<()> {
    let mut seen = BTreeSet::new();
    for meta in reg.iter() {
        if !seen.insert(meta.id.as_str()) {
            return Err(SkoError::SchemaValidation(format!(
                "duplicate skill id: {}",
                meta.id
            )));
        }
    }

    for meta in reg.iter() {
        for dep in meta.depends_on.iter().chain(&meta.conflicts_with) {
            if !reg.has(dep) {
                return Err(SkoError::DanglingReference {
                    skill: meta.id.clone(),
                    missing: dep.clone(),
                });
            }
        }
    }

    detect_cycles(reg)
}

/// Depth-first search over `depends_on` with explicit on-path and done
/// marker sets. Ids are visited in sorted order, so repeated runs over the
/// same registry report the same cycle.
fn detect_cycles(reg: &SkillRegistry) -> Result<()> {
    let mut done: BTreeSet<String> = BTreeSet::new();

    for meta in reg.iter() {
        let mut on_path: BTreeSet<String> = BTreeSet::new();
        visit(reg, &meta.id, &mut on_path, &mut done)?;
    }
    Ok(())
}

fn visit(
    reg: &SkillRegistry,
    id: &str,
    on_path: &mut BTreeSet<String>,
    done: &mut BTreeSet<String>,
) -> Result<()> {
    if done.contains(id) {
        return Ok(());
    }
    if on_path.contains(id) {
        return Err(SkoError::Cycle(vec![id.to_string()]));
    }

    on_path.insert(id.to_string());
    if let Some(meta) = reg.get(id) {
        for dep in &meta.depends_on {
            visit(reg, dep, on_path, done).map_err(|err| match err {
                // Accumulate the path as the stack unwinds so the final
                // error names the full cycle.
                SkoError::Cycle(mut path) => {
                    path.push(id.to_string());
                    SkoError::Cycle(path)
                }
                other => other,
            })?;
        }
    }
    on_path.remove(id);
    done.insert(id.to_string());
    Ok(())
}

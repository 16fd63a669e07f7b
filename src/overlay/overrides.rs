//! Override rules and the override applier.
//!
//! Overrides are user-supplied files stored per skill under the state
//! directory. On install and on every sync they are re-applied on top of a
//! freshly copied base tree: full-file replacement, or surgical replacement
//! of heading-delimited markdown sections.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Result, SkoError};

use super::markdown::index_sections;
use super::{STATE_DIR, TEMPLATE_ROOT, clean_rel_path, read_repo_file, to_slash, write_repo_file};

/// Accumulated override grants for one target file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverrideRule {
    /// A bare `path` declaration grants whole-file replacement.
    pub full_file: bool,
    /// `path#anchor` declarations grant per-section replacement.
    pub anchors: BTreeSet<String>,
}

/// The override store for one skill: `<root>/.sko/overrides/<skill-id>`.
#[must_use]
pub fn overrides_dir(root: &Path, skill_id: &str) -> PathBuf {
    root.join(STATE_DIR).join("overrides").join(skill_id)
}

/// Split a declaration into its file path and optional section anchor.
#[must_use]
pub fn split_override_path(decl: &str) -> (&str, Option<&str>) {
    match decl.split_once('#') {
        Some((path, anchor)) => (path, Some(anchor)),
        None => (decl, None),
    }
}

/// Fold `override_paths` declarations into one rule per target file.
///
/// Every path must stay under the managed template root; `..` escapes and
/// paths outside `.claude/` are structural errors.
pub fn parse_override_paths(paths: &[String]) -> Result<BTreeMap<String, OverrideRule>> {
    let mut rules: BTreeMap<String, OverrideRule> = BTreeMap::new();

    for raw in paths {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let (file_part, anchor) = split_override_path(raw);
        let file = to_slash(&clean_rel_path(file_part)?);
        if file != TEMPLATE_ROOT && !file.starts_with(".claude/") {
            return Err(SkoError::OverridePath(format!(
                "override path must start with {TEMPLATE_ROOT}/: {raw}"
            )));
        }

        let rule = rules.entry(file).or_default();
        match anchor {
            None | Some("") => rule.full_file = true,
            Some(anchor) => {
                rule.anchors.insert(anchor.to_string());
            }
        }
    }

    Ok(rules)
}

/// Apply a skill's staged overrides onto the installed `.claude/` tree.
///
/// Returns warnings for staged files the skill never declared overridable;
/// those files are skipped without touching the target. Idempotent against
/// a freshly installed base, which is what makes re-sync safe.
pub fn apply_overrides(
    root: &Path,
    skill_id: &str,
    override_paths: &[String],
) -> Result<Vec<String>> {
    let rules = parse_override_paths(override_paths)?;
    let overrides = load_override_files(root, skill_id)?;
    if overrides.is_empty() {
        return Ok(Vec::new());
    }

    let mut warnings = Vec::new();
    for (target, content) in &overrides {
        let Some(rule) = rules.get(target) else {
            warnings.push(format!(
                "override ignored for {target} (not in override_paths)"
            ));
            continue;
        };

        if rule.full_file {
            write_repo_file(root, target, content)?;
            continue;
        }

        apply_section_overrides(root, target, content, &rule.anchors)?;
    }

    Ok(warnings)
}

/// Enumerate staged override files for a skill, keyed by their target path
/// under the template root.
fn load_override_files(root: &Path, skill_id: &str) -> Result<BTreeMap<String, Vec<u8>>> {
    let store = overrides_dir(root, skill_id);
    if !store.is_dir() {
        return Ok(BTreeMap::new());
    }

    let mut overrides = BTreeMap::new();
    for entry in WalkDir::new(&store) {
        let entry = entry.map_err(|err| {
            SkoError::OverridePath(format!("walk {}: {err}", store.display()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(&store)
            .map_err(|err| SkoError::OverridePath(format!("{}: {err}", store.display())))?;
        let rel = clean_rel_path(&to_slash(rel))?;
        let target = format!("{TEMPLATE_ROOT}/{}", to_slash(&rel));
        overrides.insert(target, std::fs::read(entry.path())?);
    }

    Ok(overrides)
}

struct Splice {
    start: usize,
    end: usize,
    lines: Vec<String>,
}

/// Replace the allowed sections of `target` with the matching sections of
/// the override content.
fn apply_section_overrides(
    root: &Path,
    target: &str,
    content: &[u8],
    allowed: &BTreeSet<String>,
) -> Result<()> {
    let base = read_repo_file(root, target)
        .map_err(|err| SkoError::OverridePath(format!("read base file {target}: {err}")))?;
    let base = text_utf8(&base, target)?;
    let base_lines: Vec<&str> = base.split('\n').collect();
    let base_sections = index_sections(&base_lines);

    let override_text = text_utf8(content, target)?;
    let override_lines: Vec<&str> = override_text.split('\n').collect();
    let override_sections = index_sections(&override_lines);

    let mut splices = Vec::new();
    if override_sections.is_empty() {
        // Heading-less override content: unambiguous only when the rule
        // grants exactly one section.
        if allowed.len() != 1 {
            return Err(SkoError::OverridePath(format!(
                "heading-less override for {target} requires exactly one declared anchor"
            )));
        }
        let anchor = allowed.iter().next().map(String::as_str).unwrap_or_default();
        let section = base_sections
            .get(anchor)
            .ok_or_else(|| SkoError::SectionNotFound(anchor.to_string()))?;

        // Keep the base heading line, replace the body.
        let mut lines = vec![base_lines[section.start].to_string()];
        if !override_text.is_empty() {
            lines.extend(override_lines.iter().map(ToString::to_string));
        }
        splices.push(Splice {
            start: section.start,
            end: section.end,
            lines,
        });
    } else {
        let mut anchors: Vec<&String> = override_sections.keys().collect();
        anchors.sort();
        for anchor in anchors {
            if !allowed.contains(anchor) {
                // Undeclared anchors in override content are ignored.
                continue;
            }
            let base_section = base_sections
                .get(anchor)
                .ok_or_else(|| SkoError::SectionNotFound(anchor.clone()))?;
            let over = &override_sections[anchor];
            splices.push(Splice {
                start: base_section.start,
                end: base_section.end,
                lines: override_lines[over.start..over.end]
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            });
        }
    }

    if splices.is_empty() {
        return Ok(());
    }

    // Back-to-front so pending splices keep valid line offsets.
    splices.sort_by(|a, b| b.start.cmp(&a.start));

    let mut lines: Vec<String> = base_lines.iter().map(ToString::to_string).collect();
    for splice in splices {
        lines.splice(splice.start..splice.end, splice.lines);
    }

    write_repo_file(root, target, lines.join("\n").as_bytes())
}

fn text_utf8<'a>(data: &'a [u8], target: &str) -> Result<&'a str> {
    std::str::from_utf8(data)
        .map_err(|_| SkoError::OverridePath(format!("{target}: content is not valid UTF-8")))
}

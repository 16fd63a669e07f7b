//! Durable per-repository record of installed skills.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::Result;
use crate::skills::SkillDescriptor;

use super::STATE_DIR;
use super::overrides::overrides_dir;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstalledState {
    #[serde(default)]
    pub skills: Vec<InstalledSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledSkill {
    pub id: String,
    pub version: String,
    pub installed_at: DateTime<Utc>,
    pub has_overrides: bool,
}

fn state_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join("installed.json")
}

/// Read `installed.json`, starting empty when the file does not exist yet.
pub fn load_state(root: &Path) -> Result<InstalledState> {
    let path = state_path(root);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(InstalledState::default());
        }
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Rewrite `installed.json` wholesale.
pub fn save_state(root: &Path, state: &InstalledState) -> Result<()> {
    std::fs::create_dir_all(root.join(STATE_DIR))?;
    let data = serde_json::to_string_pretty(state)?;
    std::fs::write(state_path(root), data)?;
    Ok(())
}

/// Update the record for an already-installed id in place, or append a new
/// record. `installed_at` is refreshed either way.
pub fn upsert(state: &mut InstalledState, meta: &SkillDescriptor, has_overrides: bool) {
    let now = Utc::now();
    if let Some(existing) = state.skills.iter_mut().find(|s| s.id == meta.id) {
        existing.version = meta.version.clone();
        existing.installed_at = now;
        existing.has_overrides = has_overrides;
        return;
    }
    state.skills.push(InstalledSkill {
        id: meta.id.clone(),
        version: meta.version.clone(),
        installed_at: now,
        has_overrides,
    });
}

/// Ids of every recorded skill, in record order.
#[must_use]
pub fn installed_ids(state: &InstalledState) -> Vec<String> {
    state
        .skills
        .iter()
        .filter(|s| !s.id.is_empty())
        .map(|s| s.id.clone())
        .collect()
}

/// Whether any override file is staged for the skill.
#[must_use]
pub fn has_override_files(root: &Path, skill_id: &str) -> bool {
    let store = overrides_dir(root, skill_id);
    if !store.is_dir() {
        return false;
    }
    WalkDir::new(store)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .any(|entry| entry.file_type().is_file())
}

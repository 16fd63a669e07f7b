use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

use super::metadata::load_descriptor;
use super::types::{RepoKind, SkillDescriptor};

/// Root-level entries in the package source that are never skills.
const NON_SKILL_ENTRIES: [&str; 2] = ["_PACK_PLAN.md", "_PACK_README.md"];

/// In-memory catalog of all discoverable skills, keyed by name.
///
/// Built once per invocation; not mutated after load outside tests. The load
/// contract expects descriptor `name` and `id` to coincide, so name is the
/// effective lookup key.
#[derive(Debug, Default)]
pub struct SkillRegistry {
    skills: BTreeMap<String, SkillDescriptor>,
}

impl SkillRegistry {
    /// Scan the package source for `<dir>/skill.json` descriptors.
    ///
    /// Directories without a valid descriptor are silently skipped so that
    /// non-skill content can coexist in the source tree.
    pub fn load(source_root: &Path) -> Result<Self> {
        let mut skills = BTreeMap::new();

        for entry in std::fs::read_dir(source_root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(dir_name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if NON_SKILL_ENTRIES.contains(&dir_name.as_str()) {
                continue;
            }

            match load_descriptor(source_root, &dir_name) {
                Ok(meta) => {
                    skills.insert(meta.name.clone(), meta);
                }
                Err(err) => {
                    debug!(dir = %dir_name, %err, "skipping non-skill directory");
                }
            }
        }

        Ok(Self { skills })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SkillDescriptor> {
        self.skills.get(name)
    }

    /// All skills, sorted by id ascending.
    #[must_use]
    pub fn list(&self) -> Vec<&SkillDescriptor> {
        self.skills.values().collect()
    }

    /// Skills applicable to `kind`; `None` returns the full sorted list.
    #[must_use]
    pub fn match_repo_kind(&self, kind: Option<RepoKind>) -> Vec<&SkillDescriptor> {
        match kind {
            None => self.list(),
            Some(kind) => self
                .skills
                .values()
                .filter(|meta| meta.applies_to(kind))
                .collect(),
        }
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.skills.len()
    }

    /// Sorted descriptor iteration for deterministic validation passes.
    pub fn iter(&self) -> impl Iterator<Item = &SkillDescriptor> {
        self.skills.values()
    }

    #[cfg(test)]
    pub fn insert(&mut self, meta: SkillDescriptor) {
        self.skills.insert(meta.name.clone(), meta);
    }
}

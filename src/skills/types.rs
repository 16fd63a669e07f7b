use std::fmt;

use serde::{Deserialize, Serialize};

/// Skill category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    Concrete,
    Library,
    Generic,
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Concrete => "concrete",
            Self::Library => "library",
            Self::Generic => "generic",
        };
        f.write_str(label)
    }
}

/// Repository type a skill applies to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RepoKind {
    GoService,
    GoLibrary,
    Terraform,
    Generic,
}

impl fmt::Display for RepoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::GoService => "go-service",
            Self::GoLibrary => "go-library",
            Self::Terraform => "terraform",
            Self::Generic => "generic",
        };
        f.write_str(label)
    }
}

/// A skill's descriptor (`skill.json`). Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDescriptor {
    /// Unique identifier; must match the skill's directory name.
    #[serde(default)]
    pub id: String,
    /// Human-readable name. The load contract expects `name == id`.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SkillKind,
    /// Semantic version (e.g. `1.0.0`).
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Repository types this skill applies to.
    #[serde(rename = "repo_types", default)]
    pub repo_kinds: Vec<RepoKind>,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts_with: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,
    /// Paths safe to override: `<path-under-.claude>` or `<path>#<anchor>`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub override_paths: Vec<String>,
}

impl SkillDescriptor {
    /// Whether this skill applies to the given repository kind. Skills
    /// declaring [`RepoKind::Generic`] apply everywhere.
    #[must_use]
    pub fn applies_to(&self, kind: RepoKind) -> bool {
        self.repo_kinds
            .iter()
            .any(|rk| *rk == kind || *rk == RepoKind::Generic)
    }
}

//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkoError>;

#[derive(Debug, Error)]
pub enum SkoError {
    /// Descriptor absent, malformed, or missing a required field.
    #[error("metadata: {0}")]
    Metadata(String),

    /// Descriptor field violates the schema (id pattern, semver, enums).
    #[error("schema validation: {0}")]
    SchemaValidation(String),

    /// A `depends_on`/`conflicts_with` id does not resolve in the registry.
    #[error("skill {skill:?} references missing skill {missing:?}")]
    DanglingReference { skill: String, missing: String },

    /// Dependency cycle over `depends_on`. The path runs from the point of
    /// re-entry outward, so it names the full cycle.
    #[error("circular dependency: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("skill {0:?} not found")]
    SkillNotFound(String),

    /// Override path outside `.claude/`, not declared, or ambiguous.
    #[error("override path: {0}")]
    OverridePath(String),

    /// Anchor absent from the base file during section override.
    #[error("section {0:?} not found")]
    SectionNotFound(String),

    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

//! Template overlay engine: install skill trees, detect file-set conflicts,
//! and re-apply per-repository overrides on top of a fresh base.

pub mod conflicts;
pub mod installer;
pub mod markdown;
pub mod overrides;
pub mod state;

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SkoError};

/// Name of the per-repository state directory.
pub const STATE_DIR: &str = ".sko";

/// Managed template root inside a target repository and the package source.
pub const TEMPLATE_ROOT: &str = ".claude";

/// Normalize a relative path for repository-scoped access.
///
/// Rejects absolute paths and any `..` component so that joined writes can
/// never escape the target root.
pub fn clean_rel_path(rel: &str) -> Result<PathBuf> {
    let path = Path::new(rel);
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => {
                return Err(SkoError::OverridePath(format!("invalid path: {rel}")));
            }
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(SkoError::OverridePath(format!("invalid path: {rel}")));
    }
    Ok(clean)
}

/// Forward-slash rendering of a relative path, for manifest keys and
/// state-file entries.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a file addressed relative to the repository root.
pub fn read_repo_file(root: &Path, rel: &str) -> Result<Vec<u8>> {
    let clean = clean_rel_path(rel)?;
    Ok(std::fs::read(root.join(clean))?)
}

/// Write a file under the repository root, creating parent directories.
pub fn write_repo_file(root: &Path, rel: &str, data: &[u8]) -> Result<()> {
    let clean = clean_rel_path(rel)?;
    let target = root.join(clean);
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, data)?;
    Ok(())
}

use std::path::Path;

use super::types::RepoKind;

/// Examine a repository root and classify it.
///
/// Heuristics: a Go module with a `cmd/` directory is a service, without
/// one a library; any root-level `.tf` file means terraform; everything
/// else is generic.
#[must_use]
pub fn detect_repo_kind(root: &Path) -> RepoKind {
    if root.join("go.mod").is_file() {
        if root.join("cmd").is_dir() {
            return RepoKind::GoService;
        }
        return RepoKind::GoLibrary;
    }

    if has_files_with_ext(root, "tf") {
        return RepoKind::Terraform;
    }

    RepoKind::Generic
}

fn has_files_with_ext(root: &Path, ext: &str) -> bool {
    let Ok(entries) = std::fs::read_dir(root) else {
        return false;
    };
    entries.filter_map(std::result::Result::ok).any(|entry| {
        let path = entry.path();
        path.is_file() && path.extension().is_some_and(|e| e == ext)
    })
}

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SkoError};

use super::{TEMPLATE_ROOT, clean_rel_path, to_slash};

pub struct InstallOptions {
    pub target_dir: PathBuf,
    pub force: bool,
}

/// Copy a skill's template subtree into `<target>/.claude`.
///
/// Exact tree copy behind an explicit overwrite gate; refuses when the
/// destination already exists unless `force` is set. All writes stay under
/// the target root.
pub fn install_skill(source_root: &Path, skill_id: &str, opts: &InstallOptions) -> Result<()> {
    if skill_id.is_empty() {
        return Err(SkoError::Config("skill name is required".to_string()));
    }

    let src_root = source_root.join(skill_id).join(TEMPLATE_ROOT);
    if !src_root.is_dir() {
        return Err(SkoError::SkillNotFound(skill_id.to_string()));
    }

    let dst_root = opts.target_dir.join(TEMPLATE_ROOT);
    if dst_root.is_dir() && !opts.force {
        return Err(SkoError::Config(format!(
            "{} already exists (use --force to overwrite)",
            dst_root.display()
        )));
    }
    std::fs::create_dir_all(&dst_root)?;

    for entry in WalkDir::new(&src_root) {
        let entry = entry
            .map_err(|err| SkoError::Config(format!("walk {}: {err}", src_root.display())))?;
        let rel = entry
            .path()
            .strip_prefix(&src_root)
            .map_err(|err| SkoError::Config(format!("{}: {err}", src_root.display())))?;
        if rel.as_os_str().is_empty() {
            continue;
        }
        let rel = clean_rel_path(&to_slash(rel))?;
        let dst = dst_root.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dst)?;
            continue;
        }
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(entry.path(), &dst)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_skill(root: &Path, id: &str) {
        let tree = root.join(id).join(".claude");
        std::fs::create_dir_all(tree.join("rules")).unwrap();
        std::fs::write(tree.join("CLAUDE.md"), "# Base\n").unwrap();
        std::fs::write(tree.join("rules/style.md"), "style\n").unwrap();
    }

    #[test]
    fn install_copies_exact_tree() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fixture_skill(src.path(), "demo");

        install_skill(
            src.path(),
            "demo",
            &InstallOptions {
                target_dir: dst.path().to_path_buf(),
                force: false,
            },
        )
        .unwrap();

        let claude = std::fs::read_to_string(dst.path().join(".claude/CLAUDE.md")).unwrap();
        assert_eq!(claude, "# Base\n");
        let style = std::fs::read_to_string(dst.path().join(".claude/rules/style.md")).unwrap();
        assert_eq!(style, "style\n");
    }

    #[test]
    fn install_refuses_existing_target_without_force() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fixture_skill(src.path(), "demo");
        std::fs::create_dir_all(dst.path().join(".claude")).unwrap();

        let err = install_skill(
            src.path(),
            "demo",
            &InstallOptions {
                target_dir: dst.path().to_path_buf(),
                force: false,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("--force"));
    }

    #[test]
    fn install_force_overwrites() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fixture_skill(src.path(), "demo");
        std::fs::create_dir_all(dst.path().join(".claude")).unwrap();
        std::fs::write(dst.path().join(".claude/CLAUDE.md"), "stale\n").unwrap();

        install_skill(
            src.path(),
            "demo",
            &InstallOptions {
                target_dir: dst.path().to_path_buf(),
                force: true,
            },
        )
        .unwrap();

        let claude = std::fs::read_to_string(dst.path().join(".claude/CLAUDE.md")).unwrap();
        assert_eq!(claude, "# Base\n");
    }

    #[test]
    fn install_unknown_skill_fails() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let err = install_skill(
            src.path(),
            "ghost",
            &InstallOptions {
                target_dir: dst.path().to_path_buf(),
                force: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, SkoError::SkillNotFound(_)));
    }
}

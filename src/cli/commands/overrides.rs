//! sko override - List override targets or stage an override file
//!
//! Staging seeds the override file from the current base content so the
//! user edits from a faithful starting point instead of a blank file.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, emit_warning};
use crate::error::{Result, SkoError};
use crate::overlay::markdown::extract_section_body;
use crate::overlay::overrides::{overrides_dir, split_override_path};
use crate::overlay::state::{has_override_files, load_state, save_state, upsert};
use crate::overlay::{TEMPLATE_ROOT, clean_rel_path, read_repo_file, to_slash};
use crate::skills::SkillRegistry;

#[derive(Args, Debug)]
pub struct OverrideArgs {
    /// Skill id
    pub skill: String,

    /// Override declaration from the skill's override_paths
    #[arg(long, value_name = "PATH[#ANCHOR]")]
    pub path: Option<String>,

    /// Target repository root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Overwrite an existing override file
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct TargetsReport<'a> {
    skill: &'a str,
    override_paths: &'a [String],
}

#[derive(Serialize)]
struct CreatedReport<'a> {
    skill: &'a str,
    path: &'a str,
    override_file: String,
}

pub fn run(ctx: &AppContext, args: &OverrideArgs) -> Result<()> {
    let root = std::path::absolute(&args.root)?;

    let registry = SkillRegistry::load(&ctx.templates_root)?;
    let meta = registry
        .get(&args.skill)
        .ok_or_else(|| SkoError::SkillNotFound(args.skill.clone()))?;

    let Some(decl) = &args.path else {
        return list_targets(ctx, &meta.id, &meta.override_paths);
    };

    if !meta.override_paths.contains(decl) {
        return Err(SkoError::OverridePath(format!(
            "path {decl:?} is not in override_paths for {}",
            meta.id
        )));
    }

    let (file_part, anchor) = split_override_path(decl);
    let file = to_slash(&clean_rel_path(file_part)?);
    if !file.starts_with(".claude/") {
        return Err(SkoError::OverridePath(format!(
            "override path must start with {TEMPLATE_ROOT}/: {file}"
        )));
    }

    let base = read_base_file(&root, &ctx.templates_root, &meta.id, &file)?;
    let content = match anchor {
        Some(anchor) if !anchor.is_empty() => {
            let base = base.ok_or_else(|| {
                SkoError::Config("base file not found for section override".to_string())
            })?;
            let text = String::from_utf8(base).map_err(|_| {
                SkoError::OverridePath(format!("{file}: content is not valid UTF-8"))
            })?;
            extract_section_body(&text, anchor)?.into_bytes()
        }
        _ => base.unwrap_or_default(),
    };

    let rel = file.strip_prefix(".claude/").unwrap_or(&file);
    let override_file = overrides_dir(&root, &meta.id).join(rel);
    if override_file.exists() && !args.force {
        return Err(SkoError::Config(format!(
            "override file exists (use --force): {}",
            override_file.display()
        )));
    }
    if let Some(parent) = override_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&override_file, content)?;

    // Best-effort state refresh; the staged file is the source of truth.
    if let Ok(mut state) = load_state(&root) {
        upsert(&mut state, meta, has_override_files(&root, &meta.id));
        if let Err(err) = save_state(&root, &state) {
            emit_warning(&format!("failed to write installed skills: {err}"));
        }
    }

    if ctx.robot() {
        return emit_json(&CreatedReport {
            skill: &meta.id,
            path: decl,
            override_file: override_file.display().to_string(),
        });
    }

    let mut layout = HumanLayout::new();
    layout.push_line(format!("Created override at {}", override_file.display()));
    emit_human(layout);
    Ok(())
}

fn list_targets(ctx: &AppContext, skill_id: &str, override_paths: &[String]) -> Result<()> {
    if ctx.robot() {
        return emit_json(&TargetsReport {
            skill: skill_id,
            override_paths,
        });
    }

    let mut layout = HumanLayout::new();
    if override_paths.is_empty() {
        layout.push_line(format!("Skill {skill_id:?} does not declare override paths"));
    } else {
        layout.push_line(format!("Overrideable paths for {skill_id:?}:"));
        for path in override_paths {
            layout.bullet(path);
        }
    }
    emit_human(layout);
    Ok(())
}

/// The current base content for a target: the repository's installed copy
/// when present, otherwise the pristine template from the package source.
fn read_base_file(
    root: &Path,
    templates_root: &Path,
    skill_id: &str,
    file: &str,
) -> Result<Option<Vec<u8>>> {
    match read_repo_file(root, file) {
        Ok(data) => Ok(Some(data)),
        Err(SkoError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            let template = templates_root.join(skill_id).join(file);
            match std::fs::read(template) {
                Ok(data) => Ok(Some(data)),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err.into()),
            }
        }
        Err(err) => Err(err),
    }
}

//! sko sync - Reinstall the base template and reapply overrides

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, emit_warning};
use crate::error::{Result, SkoError};
use crate::overlay::installer::{InstallOptions, install_skill};
use crate::overlay::overrides::apply_overrides;
use crate::overlay::read_repo_file;
use crate::overlay::state::{has_override_files, load_state, save_state, upsert};
use crate::skills::{SkillDescriptor, SkillRegistry};

use super::install::write_marker;

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Target repository root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

#[derive(Serialize)]
struct SyncReport<'a> {
    synced: &'a str,
    version: &'a str,
    root: String,
    warnings: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &SyncArgs) -> Result<()> {
    let root = std::path::absolute(&args.root)?;

    let skill_id = resolve_installed_skill(&root)?;
    let registry = SkillRegistry::load(&ctx.templates_root)?;
    let meta = registry
        .get(&skill_id)
        .ok_or_else(|| SkoError::SkillNotFound(skill_id.clone()))?;

    // Re-sync always rebuilds the base from scratch, then reapplies the
    // stored overrides on top.
    install_skill(
        &ctx.templates_root,
        &meta.id,
        &InstallOptions {
            target_dir: root.clone(),
            force: true,
        },
    )?;

    let warnings = apply_overrides(&root, &meta.id, &meta.override_paths)?;
    if !ctx.robot() {
        for warning in &warnings {
            emit_warning(warning);
        }
    }

    write_marker(&root, meta)?;

    let mut state = load_state(&root)?;
    upsert(&mut state, meta, has_override_files(&root, &meta.id));
    save_state(&root, &state)?;
    info!(skill = %meta.id, root = %root.display(), "synced skill");

    if ctx.robot() {
        return emit_json(&SyncReport {
            synced: &meta.id,
            version: &meta.version,
            root: root.display().to_string(),
            warnings,
        });
    }

    let mut layout = HumanLayout::new();
    layout.push_line(format!("Synced skill {:?} in {}", meta.name, root.display()));
    emit_human(layout);
    Ok(())
}

/// Recover which skill owns the installed tree: the `.claude/skill.json`
/// marker when present, otherwise an unambiguous single-entry state file.
fn resolve_installed_skill(root: &Path) -> Result<String> {
    match read_repo_file(root, ".claude/skill.json") {
        Ok(data) => {
            let meta: SkillDescriptor = serde_json::from_slice(&data)?;
            if meta.id.is_empty() {
                Ok(meta.name)
            } else {
                Ok(meta.id)
            }
        }
        Err(SkoError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            let state = load_state(root).map_err(|_| {
                SkoError::Config("no skill.json found in .claude/".to_string())
            })?;
            if state.skills.len() == 1 {
                Ok(state.skills[0].id.clone())
            } else {
                Err(SkoError::Config(
                    "unable to determine installed skill".to_string(),
                ))
            }
        }
        Err(err) => Err(err),
    }
}

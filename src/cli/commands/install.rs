//! sko install - Copy a skill's template tree into a repository

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tracing::info;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, emit_warning};
use crate::error::{Result, SkoError};
use crate::overlay::conflicts::{Conflict, detect_conflicts};
use crate::overlay::installer::{InstallOptions, install_skill};
use crate::overlay::overrides::apply_overrides;
use crate::overlay::state::{has_override_files, installed_ids, load_state, save_state, upsert};
use crate::overlay::write_repo_file;
use crate::skills::SkillRegistry;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Skill id to install
    pub skill: String,

    /// Target repository root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Overwrite an existing .claude directory
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct InstallReport<'a> {
    installed: &'a str,
    version: &'a str,
    root: String,
    conflicts: Vec<Conflict>,
    warnings: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &InstallArgs) -> Result<()> {
    let root = std::path::absolute(&args.root)?;

    let registry = SkillRegistry::load(&ctx.templates_root)?;
    let meta = registry
        .get(&args.skill)
        .ok_or_else(|| SkoError::SkillNotFound(args.skill.clone()))?;

    let mut state = load_state(&root)?;

    // Advisory only: overlapping files never block an install.
    let mut conflicts = Vec::new();
    if !state.skills.is_empty() {
        match detect_conflicts(&ctx.templates_root, &installed_ids(&state), &meta.id) {
            Ok(found) => conflicts = found,
            Err(err) => emit_warning(&format!("conflict detection failed: {err}")),
        }
        if !conflicts.is_empty() && !ctx.robot() {
            emit_warning("potential skill conflicts detected:");
            for conflict in &conflicts {
                emit_warning(&format!(
                    "  {} (existing: {}, new: {})",
                    conflict.path, conflict.existing_skill, conflict.new_skill
                ));
            }
        }
    }

    install_skill(
        &ctx.templates_root,
        &meta.id,
        &InstallOptions {
            target_dir: root.clone(),
            force: args.force,
        },
    )?;

    // Marker used by sync to recover ownership of the installed tree.
    write_marker(&root, meta)?;

    let warnings = apply_overrides(&root, &meta.id, &meta.override_paths)?;
    if !ctx.robot() {
        for warning in &warnings {
            emit_warning(warning);
        }
    }

    upsert(&mut state, meta, has_override_files(&root, &meta.id));
    save_state(&root, &state)?;
    info!(skill = %meta.id, root = %root.display(), "installed skill");

    if ctx.robot() {
        return emit_json(&InstallReport {
            installed: &meta.id,
            version: &meta.version,
            root: root.display().to_string(),
            conflicts,
            warnings,
        });
    }

    let mut layout = HumanLayout::new();
    layout.push_line(format!(
        "Installed skill {:?} in {}",
        meta.id,
        root.display()
    ));
    emit_human(layout);
    Ok(())
}

pub(super) fn write_marker(root: &std::path::Path, meta: &crate::skills::SkillDescriptor) -> Result<()> {
    let data = serde_json::to_string_pretty(meta)?;
    write_repo_file(root, ".claude/skill.json", data.as_bytes())
}

//! sko list - Enumerate available skills

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;
use crate::skills::{RepoKind, SkillRegistry, detect_repo_kind};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only skills applicable to this repository kind
    #[arg(long, value_enum)]
    pub repo_kind: Option<RepoKind>,

    /// Detect the repository kind at --root and filter by it
    #[arg(long, conflicts_with = "repo_kind")]
    pub detect: bool,

    /// Repository root used with --detect
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let registry = SkillRegistry::load(&ctx.templates_root)?;

    let kind = if args.detect {
        Some(detect_repo_kind(&args.root))
    } else {
        args.repo_kind
    };
    let skills = registry.match_repo_kind(kind);

    if ctx.robot() {
        return emit_json(&skills);
    }

    let mut layout = HumanLayout::new();
    layout.push_line(format!(
        "{:<25} {:<10} {}",
        "NAME", "VERSION", "DESCRIPTION"
    ));
    layout.push_line("-".repeat(63));
    for meta in &skills {
        layout.push_line(format!(
            "{:<25} {:<10} {}",
            meta.name,
            meta.version,
            truncate(&meta.description, 40)
        ));
    }
    layout.blank();
    layout.push_line(format!("Total: {} skills", skills.len()));
    emit_human(layout);
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{head}...")
}

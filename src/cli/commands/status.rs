//! sko status - Show the repository's installed-skill state

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;
use crate::overlay::state::load_state;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Target repository root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

pub fn run(ctx: &AppContext, args: &StatusArgs) -> Result<()> {
    let root = std::path::absolute(&args.root)?;
    let state = load_state(&root)?;

    if ctx.robot() {
        return emit_json(&state);
    }

    let mut layout = HumanLayout::new();
    if state.skills.is_empty() {
        layout.push_line("No skills installed");
        emit_human(layout);
        return Ok(());
    }

    layout.push_line(format!(
        "{:<25} {:<10} {:<22} {}",
        "SKILL", "VERSION", "INSTALLED", "OVERRIDES"
    ));
    layout.push_line("-".repeat(66));
    for skill in &state.skills {
        layout.push_line(format!(
            "{:<25} {:<10} {:<22} {}",
            skill.id,
            skill.version,
            skill.installed_at.format("%Y-%m-%d %H:%M:%S"),
            if skill.has_overrides { "yes" } else { "no" }
        ));
    }
    emit_human(layout);
    Ok(())
}

//! sko validate - Schema and graph validation

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::Result;
use crate::skills::{SkillRegistry, validate_registry, validate_skill};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Skill id to validate; validates the whole registry when omitted
    pub skill: Option<String>,
}

#[derive(Serialize)]
struct ValidateReport {
    valid: bool,
    skills: usize,
}

pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let checked = match &args.skill {
        Some(skill) => {
            validate_skill(&ctx.templates_root, skill)?;
            1
        }
        None => {
            let registry = SkillRegistry::load(&ctx.templates_root)?;
            for meta in registry.iter() {
                validate_skill(&ctx.templates_root, &meta.id)?;
            }
            validate_registry(&registry)?;
            registry.count()
        }
    };

    if ctx.robot() {
        return emit_json(&ValidateReport {
            valid: true,
            skills: checked,
        });
    }

    let mut layout = HumanLayout::new();
    layout.push_line(format!("OK: {checked} skill(s) valid"));
    emit_human(layout);
    Ok(())
}

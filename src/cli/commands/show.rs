//! sko show - Display a skill's descriptor and override rules

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::error::{Result, SkoError};
use crate::overlay::overrides::{OverrideRule, parse_override_paths};
use crate::skills::{SkillDescriptor, SkillRegistry};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Skill id
    pub skill: String,
}

#[derive(Serialize)]
struct ShowReport<'a> {
    #[serde(flatten)]
    descriptor: &'a SkillDescriptor,
    override_rules: std::collections::BTreeMap<String, OverrideRule>,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let registry = SkillRegistry::load(&ctx.templates_root)?;
    let meta = registry
        .get(&args.skill)
        .ok_or_else(|| SkoError::SkillNotFound(args.skill.clone()))?;

    let rules = parse_override_paths(&meta.override_paths)?;

    if ctx.robot() {
        return emit_json(&ShowReport {
            descriptor: meta,
            override_rules: rules,
        });
    }

    let mut layout = HumanLayout::new();
    layout.title(&meta.name);
    layout.kv("Id", &meta.id);
    layout.kv("Kind", &meta.kind.to_string());
    layout.kv("Version", &meta.version);
    layout.kv("Description", &meta.description);
    if !meta.author.is_empty() {
        layout.kv("Author", &meta.author);
    }
    if !meta.tags.is_empty() {
        layout.kv("Tags", &meta.tags.join(", "));
    }
    layout.kv(
        "Repo kinds",
        &meta
            .repo_kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    );
    if !meta.depends_on.is_empty() {
        layout.kv("Depends on", &meta.depends_on.join(", "));
    }
    if !meta.conflicts_with.is_empty() {
        layout.kv("Conflicts with", &meta.conflicts_with.join(", "));
    }
    if !meta.provides.is_empty() {
        layout.kv("Provides", &meta.provides.join(", "));
    }

    if !rules.is_empty() {
        layout.blank();
        layout.section("Override targets");
        for (path, rule) in &rules {
            if rule.full_file {
                layout.bullet(&format!("{path} (full file)"));
            }
            for anchor in &rule.anchors {
                layout.bullet(&format!("{path}#{anchor}"));
            }
        }
    }

    emit_human(layout);
    Ok(())
}

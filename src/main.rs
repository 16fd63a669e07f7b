//! sko - Skill template overlay CLI
//!
//! Install layered `.claude/` skill packages and keep per-repository
//! customizations re-applicable across syncs.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sko::Result;
use sko::app::AppContext;
use sko::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot {
                // Robot mode: JSON error output to stdout
                let error_json = serde_json::json!({
                    "error": true,
                    "code": error_code(&e),
                    "message": e.to_string(),
                });
                println!("{}", serde_json::to_string(&error_json).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let ctx = AppContext::from_cli(cli)?;
    sko::cli::commands::run(&ctx, &cli.command)
}

fn error_code(e: &sko::SkoError) -> &'static str {
    match e {
        sko::SkoError::Metadata(_) => "metadata",
        sko::SkoError::SchemaValidation(_) => "schema_validation",
        sko::SkoError::DanglingReference { .. } => "dangling_reference",
        sko::SkoError::Cycle(_) => "cycle",
        sko::SkoError::SkillNotFound(_) => "skill_not_found",
        sko::SkoError::OverridePath(_) => "override_path",
        sko::SkoError::SectionNotFound(_) => "section_not_found",
        sko::SkoError::Config(_) => "config",
        sko::SkoError::Io(_) => "io",
        sko::SkoError::Json(_) => "json",
    }
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,sko=info",
        1 => "info,sko=debug",
        2 => "debug,sko=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

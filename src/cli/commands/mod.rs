//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod install;
pub mod list;
pub mod overrides;
pub mod show;
pub mod status;
pub mod sync;
pub mod validate;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::List(args) => list::run(ctx, args),
        Commands::Show(args) => show::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
        Commands::Install(args) => install::run(ctx, args),
        Commands::Sync(args) => sync::run(ctx, args),
        Commands::Override(args) => overrides::run(ctx, args),
        Commands::Status(args) => status::run(ctx, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available skills, optionally filtered by repository kind
    List(list::ListArgs),

    /// Show a skill's descriptor and override rules
    Show(show::ShowArgs),

    /// Validate one skill or the whole registry graph
    Validate(validate::ValidateArgs),

    /// Install a skill's template tree into a repository
    Install(install::InstallArgs),

    /// Reinstall the base template and reapply overrides
    Sync(sync::SyncArgs),

    /// List override targets or stage an override file
    Override(overrides::OverrideArgs),

    /// Show which skills are installed in a repository
    Status(status::StatusArgs),
}

use std::path::PathBuf;

use crate::cli::{Cli, OutputFormat};
use crate::error::{Result, SkoError};

pub struct AppContext {
    /// Package source root: one subdirectory per skill.
    pub templates_root: PathBuf,
    pub output_format: OutputFormat,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let templates_root = match &cli.templates {
            Some(path) => path.clone(),
            None => default_templates_root()?,
        };

        Ok(Self {
            templates_root,
            output_format: cli.output_format(),
            verbosity: cli.verbose,
        })
    }

    #[must_use]
    pub const fn robot(&self) -> bool {
        matches!(self.output_format, OutputFormat::Robot)
    }
}

fn default_templates_root() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| SkoError::Config("data directory not found".to_string()))?;
    Ok(data_dir.join("sko/templates"))
}

// Command-line arguments

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::prioritize::Mode;

#[derive(Debug, Parser)]
#[command(name = "tasklark", version, about = "Prioritize your task list together with an LLM")]
pub struct Args {
    /// Task file: a JSON task tree, or text with the goal on the first line and one task per line
    pub file: PathBuf,

    /// Task file format
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    pub mode: ModeArg,

    /// Chat model to use (overrides config)
    #[arg(long)]
    pub model: Option<String>,

    /// OpenAI-compatible API root, e.g. http://localhost:8080 (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Configuration file (default: ~/.tasklark/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose diagnostics on stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// `.json` files are task trees, anything else is a flat list
    Auto,
    Tree,
    Flat,
}

impl Args {
    pub fn resolved_mode(&self) -> Mode {
        match self.mode {
            ModeArg::Auto => Mode::detect(&self.file),
            ModeArg::Tree => Mode::Tree,
            ModeArg::Flat => Mode::Flat,
        }
    }

    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config_path: self.config.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

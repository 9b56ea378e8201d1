//! Command-line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use folio_site::{DocumentFormat, Preset};
use folio_theme::ColorScheme;

/// Headless portfolio page runtime
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a folio.toml for a preset, plus a sample scenario
    Init(InitArgs),

    /// List the configuration presets
    Presets,

    /// Validate a contact message
    Validate(ValidateArgs),

    /// Export the résumé
    Resume(ResumeArgs),

    /// Show or change the persisted colour scheme
    Theme(ThemeArgs),

    /// Run a JSON scenario against the demo page
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialise
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    #[arg(long, default_value = "classic")]
    pub preset: Preset,

    /// Overwrite an existing folio.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub subject: String,

    #[arg(long, default_value = "")]
    pub message: String,

    /// Preset whose rules apply
    #[arg(long, conflicts_with = "config")]
    pub preset: Option<Preset>,

    /// Config file (or directory holding folio.toml) whose rules apply
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ResumeArgs {
    #[arg(long, default_value = "text")]
    pub format: DocumentFormat,

    /// Output directory
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// File name without extension
    #[arg(long, default_value = "resume")]
    pub filename: String,
}

#[derive(Args, Debug)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub action: ThemeAction,

    /// Preference file; defaults to the per-user config directory
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ThemeAction {
    /// Print the active scheme and where it came from
    Show,
    /// Flip between light and dark
    Toggle,
    /// Choose a scheme explicitly
    Set { scheme: ColorScheme },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario file
    pub scenario: PathBuf,

    /// Config file (or directory holding folio.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

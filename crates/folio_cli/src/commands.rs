//! Subcommand implementations
//!
//! Every command writes its human-facing output to the given writer and
//! reports success or failure through [`Outcome`]; diagnostics go through
//! `tracing`.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use folio_core::{FileStore, Page, PreferenceStore};
use folio_site::{
    validate, DirectorySink, Download, DownloadSink, FormValues, PortfolioApp, Preset, Scenario,
    SiteConfig, ValidationRules,
};
use folio_theme::{detect_system_color_scheme, ThemeController};

use crate::cli::{Command, InitArgs, ResumeArgs, RunArgs, ThemeAction, ThemeArgs, ValidateArgs};
use crate::scaffold;

/// Whether the command's check passed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

pub fn execute(command: Command, out: &mut dyn Write) -> Result<Outcome> {
    match command {
        Command::Init(args) => init(&args, out),
        Command::Presets => presets(out),
        Command::Validate(args) => validate_message(&args, out),
        Command::Resume(args) => resume(&args, out),
        Command::Theme(args) => theme(&args, out),
        Command::Run(args) => run(&args, out),
    }
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(SiteConfig::default()),
    }
}

fn init(args: &InitArgs, out: &mut dyn Write) -> Result<Outcome> {
    let written = scaffold::init_site(&args.dir, args.preset, args.force)?;
    for path in written {
        writeln!(out, "created {}", path.display())?;
    }
    Ok(Outcome::Success)
}

fn presets(out: &mut dyn Write) -> Result<Outcome> {
    for preset in Preset::ALL {
        writeln!(out, "{:<10} {}", preset.id(), preset.description())?;
    }
    Ok(Outcome::Success)
}

fn validate_message(args: &ValidateArgs, out: &mut dyn Write) -> Result<Outcome> {
    let config = match args.preset {
        Some(preset) => preset.config(),
        None => load_config(args.config.as_deref())?,
    };
    let rules = ValidationRules::from(&config.contact);
    let values = FormValues {
        name: args.name.clone(),
        email: args.email.clone(),
        subject: args.subject.clone(),
        message: args.message.clone(),
    };
    let report = validate(&values, &rules);

    if args.json {
        let errors: serde_json::Map<String, serde_json::Value> = report
            .errors
            .iter()
            .map(|e| (e.field.to_string(), e.message.clone().into()))
            .collect();
        let payload = serde_json::json!({
            "valid": report.is_valid(),
            "errors": errors,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&payload)?)?;
    } else if report.is_valid() {
        writeln!(out, "valid")?;
    } else {
        for error in &report.errors {
            writeln!(out, "{}: {}", error.field, error.message)?;
        }
    }

    Ok(if report.is_valid() {
        Outcome::Success
    } else {
        Outcome::Failure
    })
}

fn resume(args: &ResumeArgs, out: &mut dyn Write) -> Result<Outcome> {
    if args.filename.trim().is_empty() {
        bail!("résumé file name must not be empty");
    }
    let download = Download::new(&args.filename, args.format);
    let mut sink = DirectorySink::new(&args.out);
    sink.save(&download)
        .with_context(|| format!("failed to write résumé to {}", args.out.display()))?;
    for path in sink.written() {
        writeln!(out, "wrote {}", path.display())?;
    }
    Ok(Outcome::Success)
}

fn theme(args: &ThemeArgs, out: &mut dyn Write) -> Result<Outcome> {
    let mut store = match &args.store {
        Some(path) => FileStore::open(path),
        None => FileStore::open_default(),
    }
    .context("failed to open the preference store")?;

    let mut page = Page::default();
    let mut controller = ThemeController::default();
    let system = detect_system_color_scheme();
    controller.init(&mut page, &store, system);

    match args.action {
        ThemeAction::Show => {
            let source = if controller.has_explicit_choice() {
                "stored"
            } else if system.is_some() {
                "system"
            } else {
                "default"
            };
            writeln!(out, "{} ({source})", controller.scheme())?;
            let tokens = controller.palette().for_scheme(controller.scheme());
            for (name, value) in tokens.css_variables() {
                writeln!(out, "  {name}: {value}")?;
            }
        }
        ThemeAction::Toggle => {
            let scheme = controller.toggle_theme(&mut page, &mut store)?;
            writeln!(out, "{scheme}")?;
        }
        ThemeAction::Set { scheme } => {
            controller.set_theme(&mut page, &mut store, scheme)?;
            writeln!(out, "{scheme}")?;
        }
    }
    tracing::debug!(
        "preference store {} holds {:?}",
        store.path().display(),
        store.get(&controller.settings().storage_key)
    );
    Ok(Outcome::Success)
}

fn run(args: &RunArgs, out: &mut dyn Write) -> Result<Outcome> {
    let config = load_config(args.config.as_deref())?;
    let scenario = Scenario::from_path(&args.scenario)
        .with_context(|| format!("failed to load scenario {}", args.scenario.display()))?;

    let mut app = PortfolioApp::new(config);
    for failure in app.setup_failures() {
        tracing::warn!("{}: {}", failure.feature, failure.message);
    }

    tracing::info!(
        "running scenario `{}` ({} steps)",
        scenario.name,
        scenario.steps.len()
    );
    let report = scenario.run(&mut app);
    if args.json {
        writeln!(out, "{}", report.to_json()?)?;
    } else {
        write!(out, "{report}")?;
    }

    Ok(if report.is_passed() {
        Outcome::Success
    } else {
        Outcome::Failure
    })
}

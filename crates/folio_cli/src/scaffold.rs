//! `folio init`: configuration scaffolding

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use folio_site::{Preset, SiteConfig, CONFIG_FILE};

const SCENARIO_DIR: &str = "scenarios";
const SMOKE_SCENARIO: &str = "smoke.json";

/// Write `folio.toml` for `preset` and a smoke scenario into `dir`.
/// Returns the files written.
pub fn init_site(dir: &Path, preset: Preset, force: bool) -> Result<Vec<PathBuf>> {
    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    fs::create_dir_all(dir.join(SCENARIO_DIR))
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let config = config_file(preset)?;
    fs::write(&config_path, config)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    let mut written = vec![config_path];
    let scenario_path = dir.join(SCENARIO_DIR).join(SMOKE_SCENARIO);
    if !scenario_path.exists() {
        fs::write(&scenario_path, SMOKE_SCENARIO_JSON)
            .with_context(|| format!("failed to write {}", scenario_path.display()))?;
        written.push(scenario_path);
    }
    tracing::info!("initialised {} with the {preset} preset", dir.display());
    Ok(written)
}

fn config_file(preset: Preset) -> Result<String> {
    let body = SiteConfig::preset(preset).to_toml()?;
    Ok(format!(
        "# Folio site configuration ({preset} preset: {})\n\
         # Every key is optional; remove what you don't change.\n\n{body}",
        preset.description()
    ))
}

const SMOKE_SCENARIO_JSON: &str = r##"{
  "name": "smoke",
  "steps": [
    { "type": "load" },
    { "type": "wait", "ms": 1200 },
    { "type": "assert_class", "selector": "body", "class": "loaded" },
    { "type": "click", "selector": "#theme-toggle" },
    { "type": "assert_attribute", "selector": "html", "name": "data-color-scheme", "value": "dark" },
    { "type": "click", "selector": ".nav-link[href=\"#contact\"]" },
    { "type": "wait", "ms": 800 },
    { "type": "assert_class", "selector": ".nav-link[href=\"#contact\"]", "class": "active" },
    { "type": "submit" },
    { "type": "assert_valid", "valid": false, "errors": 4 },
    { "type": "input", "selector": "[name=\"name\"]", "value": "Alex" },
    { "type": "input", "selector": "[name=\"email\"]", "value": "alex@example.com" },
    { "type": "input", "selector": "[name=\"subject\"]", "value": "Project inquiry" },
    { "type": "input", "selector": "[name=\"message\"]", "value": "I'd like to talk about a project." },
    { "type": "submit" },
    { "type": "assert_valid", "valid": true },
    { "type": "wait", "ms": 2500 },
    { "type": "assert_notification", "severity": "success" }
  ]
}
"##;

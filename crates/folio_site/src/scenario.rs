//! Scripted interaction scenarios
//!
//! A scenario is a JSON list of steps run against a [`PortfolioApp`]:
//! user actions, clock advances and assertions on the resulting page.
//! Every step is run even after a failure, so one report lists all of them.
//!
//! ```json
//! {
//!   "name": "navbar",
//!   "steps": [
//!     { "type": "scroll", "y": 150 },
//!     { "type": "assert_class", "selector": "#navbar", "class": "scrolled" }
//!   ]
//! }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;

use folio_core::KeyCode;
use folio_theme::ColorScheme;
use serde::{Deserialize, Serialize};

use crate::app::PortfolioApp;
use crate::error::{Result, SiteError};
use crate::notification::Severity;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| SiteError::io(path, e))?;
        Self::from_json(&raw)
    }

    /// Run every step against `app`
    pub fn run(&self, app: &mut PortfolioApp) -> ScenarioReport {
        let start = app.now();
        let steps: Vec<StepOutcome> = self
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let result = run_step(app, step);
                if let AssertionResult::Failed { message } = &result {
                    tracing::debug!("step {index} ({}) failed: {message}", step.kind());
                }
                StepOutcome {
                    index,
                    kind: step.kind(),
                    result,
                }
            })
            .collect();

        let failed = steps.iter().filter(|s| !s.result.is_passed()).count();
        ScenarioReport {
            name: self.name.clone(),
            status: if failed == 0 {
                ReportStatus::Passed
            } else {
                ReportStatus::Failed
            },
            passed: steps.len() - failed,
            failed,
            elapsed_ms: app.now() - start,
            steps,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tolerance() -> f32 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Click {
        selector: String,
    },
    Scroll {
        y: f32,
    },
    Input {
        selector: String,
        value: String,
    },
    Blur {
        selector: String,
    },
    Submit,
    /// Key name as in `KeyboardEvent.key`, e.g. `Escape`
    Key {
        key: String,
    },
    Wait {
        ms: u64,
    },
    Resize {
        width: f32,
        height: f32,
    },
    SystemScheme {
        scheme: ColorScheme,
    },
    Load,
    AssertClass {
        selector: String,
        class: String,
        #[serde(default = "default_true")]
        present: bool,
    },
    /// `value: null` asserts the attribute is absent
    AssertAttribute {
        selector: String,
        name: String,
        value: Option<String>,
    },
    AssertText {
        selector: String,
        contains: String,
    },
    /// `value: null` asserts the property is unset
    AssertStyle {
        selector: String,
        property: String,
        value: Option<String>,
    },
    /// Checks the most recent visible notification
    AssertNotification {
        #[serde(default)]
        contains: Option<String>,
        #[serde(default)]
        severity: Option<Severity>,
        #[serde(default)]
        count: Option<usize>,
    },
    AssertDownload {
        #[serde(default)]
        filename: Option<String>,
        #[serde(default)]
        contains: Option<String>,
    },
    AssertScroll {
        y: f32,
        #[serde(default = "default_tolerance")]
        tolerance: f32,
    },
    AssertValid {
        valid: bool,
        #[serde(default)]
        errors: Option<usize>,
    },
}

impl ScenarioStep {
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioStep::Click { .. } => "click",
            ScenarioStep::Scroll { .. } => "scroll",
            ScenarioStep::Input { .. } => "input",
            ScenarioStep::Blur { .. } => "blur",
            ScenarioStep::Submit => "submit",
            ScenarioStep::Key { .. } => "key",
            ScenarioStep::Wait { .. } => "wait",
            ScenarioStep::Resize { .. } => "resize",
            ScenarioStep::SystemScheme { .. } => "system_scheme",
            ScenarioStep::Load => "load",
            ScenarioStep::AssertClass { .. } => "assert_class",
            ScenarioStep::AssertAttribute { .. } => "assert_attribute",
            ScenarioStep::AssertText { .. } => "assert_text",
            ScenarioStep::AssertStyle { .. } => "assert_style",
            ScenarioStep::AssertNotification { .. } => "assert_notification",
            ScenarioStep::AssertDownload { .. } => "assert_download",
            ScenarioStep::AssertScroll { .. } => "assert_scroll",
            ScenarioStep::AssertValid { .. } => "assert_valid",
        }
    }
}

/// Outcome of a single step. Actions fail only when their target is missing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssertionResult {
    Passed,
    Failed { message: String },
}

impl AssertionResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionResult::Passed)
    }

    fn check(ok: bool, message: impl FnOnce() -> String) -> Self {
        if ok {
            AssertionResult::Passed
        } else {
            AssertionResult::Failed { message: message() }
        }
    }
}

impl From<SiteError> for AssertionResult {
    fn from(e: SiteError) -> Self {
        AssertionResult::Failed {
            message: e.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub kind: &'static str,
    #[serde(flatten)]
    pub result: AssertionResult,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub status: ReportStatus,
    pub passed: usize,
    pub failed: usize,
    pub elapsed_ms: u64,
    pub steps: Vec<StepOutcome>,
}

impl ScenarioReport {
    pub fn is_passed(&self) -> bool {
        self.status == ReportStatus::Passed
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.result.is_passed())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.status {
            ReportStatus::Passed => "passed",
            ReportStatus::Failed => "FAILED",
        };
        writeln!(
            f,
            "scenario {}: {status} ({} passed, {} failed, {} ms)",
            if self.name.is_empty() { "<unnamed>" } else { &self.name },
            self.passed,
            self.failed,
            self.elapsed_ms
        )?;
        for step in self.failures() {
            if let AssertionResult::Failed { message } = &step.result {
                writeln!(f, "  step {} ({}): {message}", step.index, step.kind)?;
            }
        }
        Ok(())
    }
}

fn run_step(app: &mut PortfolioApp, step: &ScenarioStep) -> AssertionResult {
    match try_step(app, step) {
        Ok(result) => result,
        Err(e) => e.into(),
    }
}

fn try_step(app: &mut PortfolioApp, step: &ScenarioStep) -> Result<AssertionResult> {
    match step {
        ScenarioStep::Click { selector } => {
            app.click_selector(selector)?;
        }
        ScenarioStep::Scroll { y } => {
            app.scroll_to(*y)?;
        }
        ScenarioStep::Input { selector, value } => {
            let target = app.find(selector)?;
            app.input(target, value)?;
        }
        ScenarioStep::Blur { selector } => {
            let target = app.find(selector)?;
            app.blur(target)?;
        }
        ScenarioStep::Submit => {
            app.submit()?;
        }
        ScenarioStep::Key { key } => {
            let code = KeyCode::from_name(key);
            if code == KeyCode::UNKNOWN {
                return Ok(AssertionResult::Failed {
                    message: format!("unknown key `{key}`"),
                });
            }
            app.key_down(code)?;
        }
        ScenarioStep::Wait { ms } => app.advance(*ms),
        ScenarioStep::Resize { width, height } => {
            app.resize(*width, *height)?;
        }
        ScenarioStep::SystemScheme { scheme } => {
            app.system_scheme_changed(scheme.is_dark())?;
        }
        ScenarioStep::Load => {
            app.load()?;
        }
        ScenarioStep::AssertClass {
            selector,
            class,
            present,
        } => {
            let element = app.find(selector)?;
            let has = app.page().has_class(element, class);
            return Ok(AssertionResult::check(has == *present, || {
                if *present {
                    format!("{selector}: expected class `{class}`")
                } else {
                    format!("{selector}: unexpected class `{class}`")
                }
            }));
        }
        ScenarioStep::AssertAttribute {
            selector,
            name,
            value,
        } => {
            let element = app.find(selector)?;
            let actual = app.page().attribute(element, name);
            return Ok(AssertionResult::check(actual == value.as_deref(), || {
                format!("{selector}[{name}]: expected {value:?}, got {actual:?}")
            }));
        }
        ScenarioStep::AssertText { selector, contains } => {
            let element = app.find(selector)?;
            let text = app.page().text(element).unwrap_or_default();
            return Ok(AssertionResult::check(text.contains(contains.as_str()), || {
                format!("{selector}: expected text containing '{contains}', got '{text}'")
            }));
        }
        ScenarioStep::AssertStyle {
            selector,
            property,
            value,
        } => {
            let element = app.find(selector)?;
            let actual = app.page().style(element, property);
            return Ok(AssertionResult::check(actual == value.as_deref(), || {
                format!("{selector} {{{property}}}: expected {value:?}, got {actual:?}")
            }));
        }
        ScenarioStep::AssertNotification {
            contains,
            severity,
            count,
        } => return Ok(assert_notification(app, contains.as_deref(), *severity, *count)),
        ScenarioStep::AssertDownload { filename, contains } => {
            return Ok(assert_download(app, filename.as_deref(), contains.as_deref()))
        }
        ScenarioStep::AssertScroll { y, tolerance } => {
            let actual = app.page().scroll_y();
            return Ok(AssertionResult::check((actual - y).abs() <= *tolerance, || {
                format!("expected scroll position {y}, got {actual}")
            }));
        }
        ScenarioStep::AssertValid { valid, errors } => {
            let Some(report) = app.last_validation() else {
                return Ok(AssertionResult::Failed {
                    message: "the contact form was never submitted".to_string(),
                });
            };
            if report.is_valid() != *valid {
                return Ok(AssertionResult::Failed {
                    message: format!(
                        "expected valid={valid}, got {} error(s): {:?}",
                        report.errors.len(),
                        report.errors.iter().map(|e| &e.message).collect::<Vec<_>>()
                    ),
                });
            }
            if let Some(expected) = errors {
                let actual = report.errors.len();
                return Ok(AssertionResult::check(actual == *expected, || {
                    format!("expected {expected} field error(s), got {actual}")
                }));
            }
        }
    }
    Ok(AssertionResult::Passed)
}

fn assert_notification(
    app: &PortfolioApp,
    contains: Option<&str>,
    severity: Option<Severity>,
    count: Option<usize>,
) -> AssertionResult {
    let visible = app.notifications();
    if let Some(expected) = count {
        if visible.len() != expected {
            return AssertionResult::Failed {
                message: format!("expected {expected} notification(s), got {}", visible.len()),
            };
        }
    }
    if contains.is_none() && severity.is_none() {
        return AssertionResult::Passed;
    }
    let Some(latest) = visible.last() else {
        return AssertionResult::Failed {
            message: "no notification is visible".to_string(),
        };
    };
    if let Some(expected) = severity {
        if latest.severity != expected {
            return AssertionResult::Failed {
                message: format!("expected a {expected} notification, got {}", latest.severity),
            };
        }
    }
    if let Some(text) = contains {
        if !latest.message.contains(text) {
            return AssertionResult::Failed {
                message: format!(
                    "expected notification containing '{text}', got '{}'",
                    latest.message
                ),
            };
        }
    }
    AssertionResult::Passed
}

fn assert_download(
    app: &PortfolioApp,
    filename: Option<&str>,
    contains: Option<&str>,
) -> AssertionResult {
    let Some(download) = app.last_download() else {
        return AssertionResult::Failed {
            message: "nothing was downloaded".to_string(),
        };
    };
    if let Some(expected) = filename {
        if download.filename != expected {
            return AssertionResult::Failed {
                message: format!(
                    "expected download `{expected}`, got `{}`",
                    download.filename
                ),
            };
        }
    }
    if let Some(text) = contains {
        if !download.text().is_some_and(|body| body.contains(text)) {
            return AssertionResult::Failed {
                message: format!("download does not contain '{text}'"),
            };
        }
    }
    AssertionResult::Passed
}

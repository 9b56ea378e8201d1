//! Contact form
//!
//! Validation is a pure function of the field values and the rules, so it
//! can be used without a page (the CLI's `validate` command does exactly
//! that). [`ContactForm`] binds it to the page: inline field errors, the
//! aggregate banner and the simulated submit cycle driven by the
//! idle → sending → sent state machine.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use folio_core::fsm::submit;
use folio_core::{ElementId, StateMachine, TimerId};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ContactConfig;
use crate::context::{Runtime, Task};
use crate::error::Result;
use crate::notification::Severity;

const FEATURE: &str = "contact-form";
const ERROR_CLASS: &str = "error";
/// Banner shown when at least one field is blank
pub const FILL_ALL_FIELDS: &str = "Please fill in all fields";

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| match Regex::new(EMAIL_PATTERN) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!("email pattern failed to compile: {e}");
                None
            }
        })
        .as_ref()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    /// The control's `name` attribute
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Message => "message",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("unknown form field `{s}`"))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl FormValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    fn any_blank(&self) -> bool {
        Field::ALL.iter().any(|f| self.get(*f).trim().is_empty())
    }
}

/// Minimum lengths, counted in characters after trimming
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationRules {
    pub min_name: usize,
    pub min_subject: usize,
    pub min_message: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_name: 2,
            min_subject: 5,
            min_message: 10,
        }
    }
}

impl From<&ContactConfig> for ValidationRules {
    fn from(config: &ContactConfig) -> Self {
        Self {
            min_name: config.min_name,
            min_subject: config.min_subject,
            min_message: config.min_message,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

/// Check a single field; `None` when it passes
///
/// Lengths are counted after trimming; the email pattern sees the raw value,
/// so surrounding whitespace makes an address invalid.
pub fn validate_field(field: Field, value: &str, rules: &ValidationRules) -> Option<String> {
    let too_short = |min: usize, label: &str| {
        (value.trim().chars().count() < min)
            .then(|| format!("{label} must be at least {min} characters"))
    };
    match field {
        Field::Name => too_short(rules.min_name, "Name"),
        Field::Email => (!email_regex().is_some_and(|re| re.is_match(value)))
            .then(|| "Please enter a valid email address".to_string()),
        Field::Subject => too_short(rules.min_subject, "Subject"),
        Field::Message => too_short(rules.min_message, "Message"),
    }
}

/// One error per violated field, in form order
pub fn validate(values: &FormValues, rules: &ValidationRules) -> ValidationReport {
    let errors = Field::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(field, values.get(field), rules)
                .map(|message| FieldError { field, message })
        })
        .collect();
    ValidationReport { errors }
}

struct FieldBinding {
    field: Field,
    control: ElementId,
    /// Inline error element, when inline errors are shown
    error: Option<ElementId>,
}

/// Contact form bound to the page
pub struct ContactForm {
    config: ContactConfig,
    rules: ValidationRules,
    form: ElementId,
    button: ElementId,
    idle_label: String,
    fields: Vec<FieldBinding>,
    state: StateMachine,
    pending: Option<TimerId>,
    last_report: Option<ValidationReport>,
}

impl ContactForm {
    pub fn setup(rt: &mut Runtime, config: &ContactConfig) -> Result<Self> {
        let form = rt.require(FEATURE, &config.form_selector)?;
        let button = rt.require(
            FEATURE,
            &format!(r#"{} button[type="submit"]"#, config.form_selector),
        )?;

        let mut fields = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let control = rt.require(
                FEATURE,
                &format!(r#"{} [name="{}"]"#, config.form_selector, field),
            )?;
            let error = if config.error_display.inline() {
                Some(Self::error_slot(rt, field, control)?)
            } else {
                None
            };
            fields.push(FieldBinding {
                field,
                control,
                error,
            });
        }

        let idle_label = rt.page.text(button).unwrap_or_default().to_string();
        tracing::debug!("contact form bound ({} fields)", fields.len());
        Ok(Self {
            config: config.clone(),
            rules: ValidationRules::from(config),
            form,
            button,
            idle_label,
            fields,
            state: submit::machine(),
            pending: None,
            last_report: None,
        })
    }

    /// Existing `[data-error-for=field]` element, or a new one after the control
    fn error_slot(rt: &mut Runtime, field: Field, control: ElementId) -> Result<ElementId> {
        if let Some(existing) = rt
            .page
            .query_selector(&format!(r#"[data-error-for="{field}"]"#))?
        {
            return Ok(existing);
        }
        let parent = rt
            .page
            .get(control)
            .and_then(|e| e.parent())
            .unwrap_or_else(|| rt.page.body());
        Ok(rt
            .page
            .append(parent, "div")
            .class("form-error")
            .attr("data-error-for", field.as_str())
            .attr("aria-live", "polite")
            .finish())
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    pub fn submit_button(&self) -> ElementId {
        self.button
    }

    pub fn is_sending(&self) -> bool {
        self.state.is_in(submit::SENDING)
    }

    pub fn is_sent(&self) -> bool {
        self.state.is_in(submit::SENT)
    }

    pub fn last_report(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    pub fn control(&self, field: Field) -> Option<ElementId> {
        self.fields
            .iter()
            .find(|b| b.field == field)
            .map(|b| b.control)
    }

    fn field_of(&self, rt: &Runtime, target: ElementId) -> Option<Field> {
        self.fields
            .iter()
            .find(|b| rt.hit(b.control, target))
            .map(|b| b.field)
    }

    pub fn values(&self, rt: &Runtime) -> FormValues {
        let value = |field: Field| {
            self.control(field)
                .map(|id| rt.page.value(id).to_string())
                .unwrap_or_default()
        };
        FormValues {
            name: value(Field::Name),
            email: value(Field::Email),
            subject: value(Field::Subject),
            message: value(Field::Message),
        }
    }

    /// Whether a click on `target` should submit the form
    pub fn is_submit_click(&self, rt: &Runtime, target: ElementId) -> bool {
        rt.hit(self.button, target)
    }

    /// Validate and, when valid, start the simulated send. Returns the
    /// report, or `None` when a send is already in flight.
    pub fn submit(&mut self, rt: &mut Runtime) -> Option<ValidationReport> {
        if self.is_sending() {
            tracing::debug!("submit ignored while sending");
            return None;
        }

        let values = self.values(rt);
        let report = validate(&values, &self.rules);

        if self.config.error_display.inline() {
            for binding in &self.fields {
                let message = report.error_for(binding.field);
                Self::show_field_error(rt, binding, message);
            }
        }

        if report.is_valid() {
            self.state.send(submit::SUBMIT);
            rt.page.set_text(self.button, &self.config.sending_label);
            rt.page.set_attribute(self.button, "disabled", "");
            self.pending = Some(rt.schedule(self.config.send_delay_ms, Task::DeliverMessage));
            tracing::debug!("contact message sending ({} ms)", self.config.send_delay_ms);
        } else {
            tracing::debug!("contact form invalid: {} error(s)", report.errors.len());
            if self.config.error_display.banner() {
                let banner = if values.any_blank() {
                    FILL_ALL_FIELDS.to_string()
                } else {
                    report
                        .errors
                        .first()
                        .map(|e| e.message.clone())
                        .unwrap_or_default()
                };
                rt.notify(&banner, Severity::Error);
            }
        }

        self.last_report = Some(report.clone());
        Some(report)
    }

    /// The simulated network call finished
    pub fn deliver(&mut self, rt: &mut Runtime) {
        if !self.state.can_send(submit::DELIVERED) {
            return;
        }
        self.pending.take();
        self.state.send(submit::DELIVERED);
        rt.page.set_text(self.button, &self.idle_label);
        rt.page.remove_attribute(self.button, "disabled");
        for binding in &self.fields {
            rt.page.set_value(binding.control, "");
            Self::show_field_error(rt, binding, None);
        }
        let message = self.config.success_message.clone();
        rt.notify(&message, Severity::Success);
        tracing::debug!("contact message delivered");
    }

    /// A control's value changed. Returns whether the event belonged to the form.
    pub fn input(&mut self, rt: &mut Runtime, target: ElementId, value: &str) -> bool {
        let Some(field) = self.field_of(rt, target) else {
            return false;
        };
        rt.page.set_value(target, value);
        if let Some(binding) = self.fields.iter().find(|b| b.field == field) {
            Self::show_field_error(rt, binding, None);
        }
        if self.is_sent() {
            self.state.send(submit::RESET);
        }
        true
    }

    /// A control lost focus: validate just that field
    pub fn blur(&mut self, rt: &mut Runtime, target: ElementId) -> bool {
        let Some(binding) = self.fields.iter().find(|b| rt.hit(b.control, target)) else {
            return false;
        };
        let message = validate_field(binding.field, rt.page.value(binding.control), &self.rules);
        if self.config.error_display.inline() {
            Self::show_field_error(rt, binding, message.as_deref());
        }
        true
    }

    fn show_field_error(rt: &mut Runtime, binding: &FieldBinding, message: Option<&str>) {
        match message {
            Some(message) => {
                rt.page.add_class(binding.control, ERROR_CLASS);
                rt.page.set_attribute(binding.control, "aria-invalid", "true");
                if let Some(slot) = binding.error {
                    rt.page.set_text(slot, message);
                }
            }
            None => {
                rt.page.remove_class(binding.control, ERROR_CLASS);
                rt.page.remove_attribute(binding.control, "aria-invalid");
                if let Some(slot) = binding.error {
                    rt.page.set_text(slot, "");
                }
            }
        }
    }
}

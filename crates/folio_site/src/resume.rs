//! Résumé document generator and download plumbing
//!
//! The résumé body is a fixed Markdown template. As text it is served
//! verbatim; as HTML it is rendered with `pulldown-cmark` into a standalone
//! page. Downloads go through a [`DownloadSink`]: the page keeps them in
//! memory, the CLI writes them to a directory.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use folio_core::ElementId;
use pulldown_cmark::{html, Options, Parser};
use serde::{Deserialize, Serialize};

use crate::config::ResumeConfig;
use crate::context::Runtime;
use crate::error::{Result, SiteError};
use crate::notification::Severity;

const FEATURE: &str = "resume";

pub const RESUME_TEMPLATE: &str = "\
# Alex Morgan

Full-stack developer · alex.morgan@example.com · github.com/alexmorgan

## Summary

Developer with six years of experience building web applications, APIs and
developer tooling. Comfortable across the stack, happiest when making slow
things fast and confusing things clear.

## Experience

### Senior Software Engineer, Northwind Labs (2021 to present)

- Led the migration of a monolithic storefront to independently deployed services
- Cut median page load time from 3.1 s to 1.2 s
- Mentored four engineers through their first production launches

### Software Engineer, Blue Harbor Digital (2018 to 2021)

- Built the customer dashboard used by 40,000 monthly active users
- Introduced end-to-end tests that caught regressions before release

## Skills

- Languages: Rust, TypeScript, Python, SQL
- Frontend: React, CSS architecture, accessibility
- Backend: PostgreSQL, Redis, message queues
- Practices: testing, code review, continuous delivery

## Education

B.Sc. Computer Science, State University (2018)
";

/// Output format of the generated document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// The Markdown template as-is
    #[default]
    Text,
    /// Standalone HTML page
    Html,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Text => "txt",
            DocumentFormat::Html => "html",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            DocumentFormat::Text => "text/plain;charset=utf-8",
            DocumentFormat::Html => "text/html;charset=utf-8",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentFormat::Text => "text",
            DocumentFormat::Html => "html",
        })
    }
}

impl FromStr for DocumentFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(DocumentFormat::Text),
            "html" => Ok(DocumentFormat::Html),
            other => Err(format!("unknown document format `{other}` (expected text or html)")),
        }
    }
}

/// Render the résumé in `format`
pub fn generate_document(format: DocumentFormat) -> String {
    match format {
        DocumentFormat::Text => RESUME_TEMPLATE.to_string(),
        DocumentFormat::Html => render_html(RESUME_TEMPLATE),
    }
}

fn render_html(markdown: &str) -> String {
    let title = markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .unwrap_or("Résumé");

    let mut body = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut body, Parser::new_ext(markdown, Options::empty()));

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        html_escape::encode_text(title),
        body
    )
}

/// A file handed to the host for saving
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn new(stem: &str, format: DocumentFormat) -> Self {
        Self {
            filename: format!("{stem}.{}", format.extension()),
            mime: format.mime(),
            bytes: generate_document(format).into_bytes(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// Receives generated downloads
pub trait DownloadSink {
    fn save(&mut self, download: &Download) -> Result<()>;
}

/// Keeps every download in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    downloads: Vec<Download>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downloads(&self) -> &[Download] {
        &self.downloads
    }
}

impl DownloadSink for MemorySink {
    fn save(&mut self, download: &Download) -> Result<()> {
        self.downloads.push(download.clone());
        Ok(())
    }
}

/// Writes downloads into a directory, creating it when needed
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// Reject names that would leave the target directory
pub(crate) fn check_filename(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let plain = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
        && !name.contains(['/', '\\']);
    if plain {
        Ok(())
    } else {
        Err(SiteError::UnsafeFilename(name.to_string()))
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, download: &Download) -> Result<()> {
        check_filename(&download.filename)?;
        fs::create_dir_all(&self.dir).map_err(|e| SiteError::io(&self.dir, e))?;
        let path = self.dir.join(&download.filename);
        fs::write(&path, &download.bytes).map_err(|e| SiteError::io(&path, e))?;
        tracing::info!("wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Download control on the page
pub struct ResumeDownload {
    trigger: ElementId,
    filename: String,
    format: DocumentFormat,
}

impl ResumeDownload {
    pub fn setup(rt: &mut Runtime, config: &ResumeConfig) -> Result<Self> {
        let trigger = rt.require(FEATURE, &config.trigger_selector)?;
        Ok(Self {
            trigger,
            filename: config.filename.clone(),
            format: config.format,
        })
    }

    pub fn trigger(&self) -> ElementId {
        self.trigger
    }

    /// Generate and save the document when `target` is the trigger
    pub fn click(
        &self,
        rt: &mut Runtime,
        sink: &mut dyn DownloadSink,
        target: ElementId,
    ) -> Result<Option<Download>> {
        if !rt.hit(self.trigger, target) {
            return Ok(None);
        }
        let download = Download::new(&self.filename, self.format);
        sink.save(&download)?;
        tracing::debug!("résumé downloaded as {}", download.filename);
        rt.notify("Resume downloaded successfully!", Severity::Success);
        Ok(Some(download))
    }
}

//! # Complaint Reports
//!
//! Lays out a finished [`ComplaintRecord`] as a fixed-format document and saves
//! it through a [`ReportBackend`].
//!
//! The backend is optional. With none configured, or one that reports itself
//! unavailable when asked, [`ReportExporter::export`] fails fast with
//! [`ReportError::Unavailable`]; the caller shows that in the transcript.
//!
//! Files are written with atomic rename (write `.tmp`, then `rename()`).

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, info};

use crate::core::state::ComplaintRecord;

/// Page width in columns.
const PAGE_WIDTH: usize = 72;
/// Left margin for the body.
const MARGIN: usize = 2;
/// Column where field values start.
const VALUE_COLUMN: usize = 18;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ReportError {
    /// No report capability right now. Non-fatal.
    Unavailable(String),
    Io(io::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Unavailable(why) => write!(f, "{why}"),
            ReportError::Io(e) => write!(f, "Could not save the report: {e}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ============================================================================
// Backend
// ============================================================================

/// Somewhere a finished report can be saved.
pub trait ReportBackend {
    fn name(&self) -> &str;

    /// Checked immediately before every export.
    fn is_available(&self) -> bool;

    /// Save `document` under `file_name`, returning where it ended up.
    fn save(&self, file_name: &str, document: &str) -> Result<PathBuf, ReportError>;
}

/// Writes reports into a directory on disk.
pub struct DirectoryBackend {
    dir: PathBuf,
}

impl DirectoryBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportBackend for DirectoryBackend {
    fn name(&self) -> &str {
        "directory"
    }

    fn is_available(&self) -> bool {
        fs::create_dir_all(&self.dir).is_ok() && self.dir.is_dir()
    }

    fn save(&self, file_name: &str, document: &str) -> Result<PathBuf, ReportError> {
        let path = self.dir.join(file_name);
        atomic_write(&path, document).map_err(ReportError::Io)?;
        Ok(path)
    }
}

/// Atomically write `contents` to `path` (via `.tmp` + rename).
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, contents)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

// ============================================================================
// Exporter
// ============================================================================

pub struct ReportExporter {
    backend: Option<Box<dyn ReportBackend>>,
    company_name: String,
}

impl ReportExporter {
    pub fn new(backend: Option<Box<dyn ReportBackend>>, company_name: impl Into<String>) -> Self {
        Self {
            backend,
            company_name: company_name.into(),
        }
    }

    /// Exporter with no backend. Every export reports `Unavailable`.
    pub fn disabled(company_name: impl Into<String>) -> Self {
        Self::new(None, company_name)
    }

    /// Lay out `record` and save it. Fails fast if no backend can take it.
    pub fn export(&self, record: &ComplaintRecord) -> Result<PathBuf, ReportError> {
        let backend = match &self.backend {
            Some(backend) if backend.is_available() => backend,
            Some(backend) => {
                return Err(ReportError::Unavailable(format!(
                    "The {} report backend is not available.",
                    backend.name()
                )));
            }
            None => {
                return Err(ReportError::Unavailable(
                    "No report backend is available.".to_string(),
                ));
            }
        };

        let document = render(record, &self.company_name, Local::now());
        let path = backend.save(&file_name(record), &document)?;
        info!("Exported report for {} to {}", record.ticket, path.display());
        Ok(path)
    }
}

/// `Complaint_<ticket>.txt`
pub fn file_name(record: &ComplaintRecord) -> String {
    format!("Complaint_{}.txt", record.ticket)
}

// ============================================================================
// Layout
// ============================================================================

/// Lay out the report: header, date and time, ticket, type, wrapped details, footer.
pub fn render(record: &ComplaintRecord, company_name: &str, at: DateTime<Local>) -> String {
    let rule = "=".repeat(PAGE_WIDTH);
    let mut lines = vec![
        String::new(),
        center(&format!("{company_name} Complaint Report")),
        rule.clone(),
        String::new(),
        field("Date", &at.format("%Y-%m-%d").to_string()),
        field("Time", &at.format("%H:%M:%S").to_string()),
        field("Ticket Number", &record.ticket),
        field("Complaint Type", &record.kind),
        String::new(),
        format!("{:MARGIN$}Complaint Details:", ""),
    ];

    let body_width = PAGE_WIDTH - MARGIN * 2;
    let options = textwrap::Options::new(body_width)
        .initial_indent("  ")
        .subsequent_indent("  ")
        .break_words(true);
    lines.extend(
        textwrap::wrap(&record.details, options)
            .into_iter()
            .map(|line| line.into_owned()),
    );

    lines.push(String::new());
    lines.push(rule);
    lines.push(center(&format!("Generated by {company_name} Support Chatbot")));

    debug!("Rendered report with {} lines", lines.len());
    let mut document = lines.join("\n");
    document.push('\n');
    document
}

fn field(label: &str, value: &str) -> String {
    let label = format!("{label}:");
    format!("{:MARGIN$}{label:<width$}{value}", "", width = VALUE_COLUMN - MARGIN)
}

fn center(text: &str) -> String {
    let pad = PAGE_WIDTH.saturating_sub(text.chars().count()) / 2;
    format!("{:pad$}{text}", "")
}

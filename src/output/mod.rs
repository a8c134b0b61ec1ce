//! Writers for the annotated result table.
//!
//! Results are first rendered into a [`ResultTable`] of display rows, then
//! written as a styled spreadsheet ([`xlsx`]) or delimited text
//! ([`delimited`]). Every writer stages its bytes in a temporary file
//! next to the destination and renames it into place, so a failed run never
//! leaves a truncated artifact behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::SignalResult;

pub mod delimited;
pub mod xlsx;

/// Column headers of the result table
pub const HEADERS: [&str; 4] = ["Signal name", "Mass", "Lipid name", "Confidence"];

/// Separator between ranked entries in a joined cell
pub const RANK_SEPARATOR: &str = " > ";

/// Default directory for result files
pub const DEFAULT_OUTPUT_DIR: &str = "Processed";

/// Prefix added to the input file stem
pub const OUTPUT_PREFIX: &str = "Processed_";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Presentation settings for confidence values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places shown for each confidence
    pub decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

/// One display row per observed signal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub signal_name: String,
    pub mass: f64,
    pub lipid_names: String,
    pub confidences: String,
}

/// Display rows in signal input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    #[must_use]
    pub fn from_results(results: &[SignalResult], display: &DisplayConfig) -> Self {
        let rows = results
            .iter()
            .map(|result| ResultRow {
                signal_name: result.signal_name.clone(),
                mass: result.mass,
                lipid_names: result.reference_names().join(RANK_SEPARATOR),
                confidences: result
                    .confidences()
                    .iter()
                    .map(|c| format_confidence(*c, display.decimals))
                    .collect::<Vec<_>>()
                    .join(RANK_SEPARATOR),
            })
            .collect();

        Self { rows }
    }

    /// Header and row text, as written to text outputs
    #[must_use]
    pub fn text_rows(&self) -> Vec<[String; 4]> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(HEADERS.map(String::from));
        out.extend(self.rows.iter().map(|row| {
            [
                row.signal_name.clone(),
                row.mass.to_string(),
                row.lipid_names.clone(),
                row.confidences.clone(),
            ]
        }));
        out
    }
}

/// Round a confidence for display.
///
/// Values that round to zero are shown without a sign.
///
/// ```
/// use lipid_match::output::format_confidence;
///
/// assert_eq!(format_confidence(0.5259, 2), "0.53");
/// assert_eq!(format_confidence(-0.001, 2), "0.00");
/// ```
#[must_use]
pub fn format_confidence(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    match text.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned.to_string(),
        _ => text,
    }
}

/// Output file kinds, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Xlsx,
    Csv,
    Tsv,
}

impl OutputKind {
    /// Detect the output kind from a destination path
    ///
    /// # Errors
    ///
    /// Returns `OutputError::UnsupportedFormat` for unknown extensions.
    pub fn from_path(path: &Path) -> Result<Self, OutputError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            Some("tsv" | "txt") => Ok(Self::Tsv),
            Some(e) => Err(OutputError::UnsupportedFormat(e.to_string())),
            None => Err(OutputError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// `<output_dir>/Processed_<input stem>.xlsx`
///
/// A relative `output_dir` is taken from the folder holding the input, so
/// results land beside the file they came from.
#[must_use]
pub fn default_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "results".to_string(), |s| s.to_string_lossy().into_owned());
    let dir = input
        .parent()
        .map_or_else(|| output_dir.to_path_buf(), |parent| parent.join(output_dir));
    dir.join(format!("{OUTPUT_PREFIX}{stem}.xlsx"))
}

/// Write the table to `path`, choosing the format from its extension.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns `OutputError` if the format is unsupported or writing fails.
pub fn write_table(table: &ResultTable, path: &Path) -> Result<(), OutputError> {
    let kind = OutputKind::from_path(path)?;
    let bytes = match kind {
        OutputKind::Xlsx => xlsx::render(table)?,
        OutputKind::Csv => delimited::render(table, b',')?,
        OutputKind::Tsv => delimited::render(table, b'\t')?,
    };
    persist_bytes(path, &bytes)
}

/// Stage bytes in a temporary file beside `path`, then rename into place
///
/// # Errors
///
/// Returns `OutputError::Io` or `OutputError::Persist` on failure.
pub fn persist_bytes(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.persist(path)?;
    Ok(())
}

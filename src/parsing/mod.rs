//! Loaders that turn tabular files into reference and signal tables.
//!
//! This module provides readers for:
//!
//! - **Spreadsheets** (`.xlsx`, `.xlsm`, `.xls`, `.ods`): read with calamine
//! - **Delimited text** (`.csv`, `.tsv`, `.txt`): read with the csv crate
//!
//! Both produce a [`RawTable`] of cells which is then reduced to
//! (name, mass) pairs according to a [`TableLayout`].
//!
//! ## Layout
//!
//! Instrument exports typically carry a few metadata rows above the
//! header. The layout says how many rows to skip, which header labels
//! hold the name and mass, and whether masses may use a decimal comma.
//! The reference and signal tables may share a sheet side by side; rows
//! where both of a table's cells are blank are ignored.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lipid_match::parsing::{load_references, load_signals, TableLayout};
//! use std::path::Path;
//!
//! let path = Path::new("run_42.xlsx");
//! let references = load_references(path, &TableLayout::references()).unwrap();
//! let signals = load_signals(path, &TableLayout::signals()).unwrap();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::types::{ObservedSignal, ReferenceEntry, TableKind};
use crate::utils::validation::{
    check_row_limit, parse_mass_text, DataValidationError, MAX_TABLE_ROWS,
};

pub mod tsv;
pub mod workbook;

/// Metadata rows above the header in the instrument export
pub const DEFAULT_SKIP_ROWS: usize = 4;
pub const DEFAULT_REFERENCE_NAME_COLUMN: &str = "Lipid name";
pub const DEFAULT_REFERENCE_MASS_COLUMN: &str = "Exact Mass";
pub const DEFAULT_SIGNAL_NAME_COLUMN: &str = "Signal name";
pub const DEFAULT_SIGNAL_MASS_COLUMN: &str = "Mass";

/// Extensions accepted as spreadsheet workbooks
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// Extensions accepted as delimited text
pub const DELIMITED_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Sheet '{0}' not found in workbook")]
    MissingSheet(String),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("No header row found after skipping {0} rows")]
    MissingHeader(usize),

    #[error("Column '{column}' not found in the {table} table header")]
    MissingColumn { table: TableKind, column: String },

    #[error("Too many rows: {0} exceeds maximum allowed ({max})", max = MAX_TABLE_ROWS)]
    TooManyRows(usize),

    #[error(transparent)]
    Validation(#[from] DataValidationError),
}

/// How to find a (name, mass) table inside a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    /// Worksheet to read; the first sheet when unset. Ignored for delimited text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    /// Rows above the header row
    pub skip_rows: usize,

    /// Header label of the name column
    pub name_column: String,

    /// Header label of the mass column
    pub mass_column: String,

    /// Accept `,` as the decimal separator in text cells
    pub decimal_comma: bool,
}

impl TableLayout {
    /// Default layout of the reference library table
    #[must_use]
    pub fn references() -> Self {
        Self {
            sheet: None,
            skip_rows: DEFAULT_SKIP_ROWS,
            name_column: DEFAULT_REFERENCE_NAME_COLUMN.to_string(),
            mass_column: DEFAULT_REFERENCE_MASS_COLUMN.to_string(),
            decimal_comma: true,
        }
    }

    /// Default layout of the observed signal table
    #[must_use]
    pub fn signals() -> Self {
        Self {
            sheet: None,
            skip_rows: DEFAULT_SKIP_ROWS,
            name_column: DEFAULT_SIGNAL_NAME_COLUMN.to_string(),
            mass_column: DEFAULT_SIGNAL_MASS_COLUMN.to_string(),
            decimal_comma: true,
        }
    }
}

/// A single cell value as read from the source file
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Number(_) => false,
            Self::Text(s) => s.trim().is_empty(),
        }
    }

    /// Trimmed text form of the cell
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

/// A source row with its 1-based row number
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub number: usize,
    pub cells: Vec<Cell>,
}

impl RawRow {
    fn cell(&self, index: usize) -> &Cell {
        self.cells.get(index).unwrap_or(&Cell::Empty)
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

/// All rows of one sheet or delimited file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<RawRow>,
}

/// Kind of input file, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Csv,
    Tsv,
}

impl InputFormat {
    /// Detect the input format from a file extension
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnsupportedFormat` for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some(e) if WORKBOOK_EXTENSIONS.contains(&e) => Ok(Self::Workbook),
            Some("csv") => Ok(Self::Csv),
            Some("tsv" | "txt") => Ok(Self::Tsv),
            Some(e) => Err(ParseError::UnsupportedFormat(e.to_string())),
            None => Err(ParseError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Whether a path has an extension this crate can load
#[must_use]
pub fn is_supported_input(path: &Path) -> bool {
    InputFormat::from_path(path).is_ok()
}

/// Read a file into raw rows, dispatching on its extension
///
/// # Errors
///
/// Returns `ParseError` if the format is unsupported or the file cannot be read.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<RawTable, ParseError> {
    match InputFormat::from_path(path)? {
        InputFormat::Workbook => workbook::read_sheet(path, sheet),
        InputFormat::Csv => tsv::read_delimited_file(path, b','),
        InputFormat::Tsv => tsv::read_delimited_file(path, b'\t'),
    }
}

/// Load the reference library from a file
///
/// # Errors
///
/// Returns `ParseError` if the file cannot be read, a column is missing, or
/// a row fails validation.
pub fn load_references(path: &Path, layout: &TableLayout) -> Result<Vec<ReferenceEntry>, ParseError> {
    let table = read_table(path, layout.sheet.as_deref())?;
    let references = references_from_table(&table, layout)?;
    debug!(
        "Loaded {} reference entries from {}",
        references.len(),
        path.display()
    );
    Ok(references)
}

/// Load observed signals from a file
///
/// # Errors
///
/// Returns `ParseError` if the file cannot be read, a column is missing, or
/// a row fails validation.
pub fn load_signals(path: &Path, layout: &TableLayout) -> Result<Vec<ObservedSignal>, ParseError> {
    let table = read_table(path, layout.sheet.as_deref())?;
    let signals = signals_from_table(&table, layout)?;
    debug!("Loaded {} signals from {}", signals.len(), path.display());
    Ok(signals)
}

/// Extract reference entries from raw rows
///
/// # Errors
///
/// See [`load_references`].
pub fn references_from_table(
    table: &RawTable,
    layout: &TableLayout,
) -> Result<Vec<ReferenceEntry>, ParseError> {
    Ok(extract_named_masses(table, layout, TableKind::Reference)?
        .into_iter()
        .map(|(name, mass)| ReferenceEntry::new(name, mass))
        .collect())
}

/// Extract observed signals from raw rows
///
/// # Errors
///
/// See [`load_signals`].
pub fn signals_from_table(
    table: &RawTable,
    layout: &TableLayout,
) -> Result<Vec<ObservedSignal>, ParseError> {
    Ok(extract_named_masses(table, layout, TableKind::Signal)?
        .into_iter()
        .map(|(name, mass)| ObservedSignal::new(name, mass))
        .collect())
}

fn extract_named_masses(
    table: &RawTable,
    layout: &TableLayout,
    kind: TableKind,
) -> Result<Vec<(String, f64)>, ParseError> {
    // Header is the first non-blank row below the skipped metadata rows
    let header_pos = table
        .rows
        .iter()
        .position(|row| row.number > layout.skip_rows && !row.is_blank())
        .ok_or(ParseError::MissingHeader(layout.skip_rows))?;
    let header = &table.rows[header_pos];

    let name_idx = find_column(header, &layout.name_column, kind)?;
    let mass_idx = find_column(header, &layout.mass_column, kind)?;

    let mut entries = Vec::new();

    for row in &table.rows[header_pos + 1..] {
        let name_cell = row.cell(name_idx);
        let mass_cell = row.cell(mass_idx);

        match (name_cell.is_blank(), mass_cell.is_blank()) {
            // Shorter table in a shared sheet, or trailing blank rows
            (true, true) => continue,
            (true, false) => {
                return Err(DataValidationError::MissingCell {
                    table: kind,
                    row: row.number,
                    column: layout.name_column.clone(),
                }
                .into());
            }
            (false, true) => {
                return Err(DataValidationError::MissingCell {
                    table: kind,
                    row: row.number,
                    column: layout.mass_column.clone(),
                }
                .into());
            }
            (false, false) => {}
        }

        let mass = match mass_cell {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_mass_text(s, layout.decimal_comma),
            Cell::Empty => None,
        }
        .ok_or_else(|| DataValidationError::NonNumericMass {
            table: kind,
            row: row.number,
            value: mass_cell.text(),
        })?;

        if check_row_limit(entries.len()).is_some() {
            return Err(ParseError::TooManyRows(entries.len() + 1));
        }

        entries.push((name_cell.text(), mass));
    }

    if entries.is_empty() {
        return Err(DataValidationError::EmptyTable(kind).into());
    }

    Ok(entries)
}

fn find_column(header: &RawRow, column: &str, kind: TableKind) -> Result<usize, ParseError> {
    let wanted = column.trim();
    header
        .cells
        .iter()
        .position(|cell| cell.text() == wanted)
        .ok_or_else(|| ParseError::MissingColumn {
            table: kind,
            column: column.to_string(),
        })
}

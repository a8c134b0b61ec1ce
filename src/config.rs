//! Run configuration.
//!
//! A run is fully described by a [`RunConfig`]. Defaults reproduce the
//! instrument export layout the tool was built for; a JSON file (see
//! [`ConfigFile`]) and then command-line flags may override any field.
//!
//! ```json
//! {
//!   "tolerance_ppm": 3.0,
//!   "decimals": 3,
//!   "references": { "sheet": "Library", "mass_column": "Monoisotopic Mass" },
//!   "signals": { "skip_rows": 0 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::MatchingConfig;
use crate::output::{DisplayConfig, DEFAULT_OUTPUT_DIR};
use crate::parsing::TableLayout;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub matching: MatchingConfig,
    pub references: TableLayout,
    pub signals: TableLayout,
    pub display: DisplayConfig,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            references: TableLayout::references(),
            signals: TableLayout::signals(),
            display: DisplayConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl RunConfig {
    /// Apply every field set in `overrides` on top of the current values
    pub fn apply(&mut self, overrides: &ConfigFile) {
        if let Some(tolerance) = overrides.tolerance_ppm {
            self.matching.tolerance_ppm = tolerance;
        }
        if let Some(parallel) = overrides.parallel {
            self.matching.parallel = parallel;
        }
        if let Some(decimals) = overrides.decimals {
            self.display.decimals = decimals;
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir.clone_from(dir);
        }
        overrides.references.apply_to(&mut self.references);
        overrides.signals.apply_to(&mut self.signals);
    }
}

/// Optional overrides, as read from a JSON config file or built from flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub tolerance_ppm: Option<f64>,
    pub parallel: Option<bool>,
    pub decimals: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub references: LayoutOverrides,
    pub signals: LayoutOverrides,
}

impl ConfigFile {
    /// Load overrides from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is not valid JSON
    /// for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse overrides from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` on invalid JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Optional overrides for one [`TableLayout`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutOverrides {
    pub sheet: Option<String>,
    pub skip_rows: Option<usize>,
    pub name_column: Option<String>,
    pub mass_column: Option<String>,
    pub decimal_comma: Option<bool>,
}

impl LayoutOverrides {
    fn apply_to(&self, layout: &mut TableLayout) {
        if let Some(sheet) = &self.sheet {
            layout.sheet = Some(sheet.clone());
        }
        if let Some(skip_rows) = self.skip_rows {
            layout.skip_rows = skip_rows;
        }
        if let Some(name) = &self.name_column {
            layout.name_column.clone_from(name);
        }
        if let Some(mass) = &self.mass_column {
            layout.mass_column.clone_from(mass);
        }
        if let Some(decimal_comma) = self.decimal_comma {
            layout.decimal_comma = decimal_comma;
        }
    }
}

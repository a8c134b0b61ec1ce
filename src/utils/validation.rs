//! Centralized validation and helper functions.

use thiserror::Error;

use crate::core::types::{ObservedSignal, ReferenceEntry, TableKind};

/// Maximum number of data rows accepted from a single table (DOS protection)
pub const MAX_TABLE_ROWS: usize = 1_000_000;

/// Invalid or incomplete input data.
///
/// Row numbers are 1-based source rows when the value came from a file;
/// positions are 1-based indexes into the in-memory table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataValidationError {
    #[error("The {0} table contains no entries")]
    EmptyTable(TableKind),

    #[error("Invalid mass {mass} for {table} entry '{name}' at position {position}: masses must be positive finite numbers")]
    InvalidMass {
        table: TableKind,
        position: usize,
        name: String,
        mass: f64,
    },

    #[error("Missing value in column '{column}' of the {table} table on row {row}")]
    MissingCell {
        table: TableKind,
        row: usize,
        column: String,
    },

    #[error("Non-numeric mass '{value}' in the {table} table on row {row}")]
    NonNumericMass {
        table: TableKind,
        row: usize,
        value: String,
    },

    #[error("Invalid tolerance {0} ppm: must be a finite, non-negative number")]
    InvalidTolerance(f64),
}

/// Check that a mass is usable as a divisor and a comparison operand.
///
/// # Examples
///
/// ```
/// use lipid_match::utils::validation::is_valid_mass;
///
/// assert!(is_valid_mass(760.5851));
/// assert!(!is_valid_mass(0.0));
/// assert!(!is_valid_mass(-1.0));
/// assert!(!is_valid_mass(f64::NAN));
/// ```
#[must_use]
pub fn is_valid_mass(mass: f64) -> bool {
    mass.is_finite() && mass > 0.0
}

/// Validate the reference library before matching.
///
/// # Errors
///
/// Returns `DataValidationError::EmptyTable` if there are no entries, or
/// `DataValidationError::InvalidMass` for the first entry with a bad mass.
pub fn validate_references(references: &[ReferenceEntry]) -> Result<(), DataValidationError> {
    if references.is_empty() {
        return Err(DataValidationError::EmptyTable(TableKind::Reference));
    }

    for (i, entry) in references.iter().enumerate() {
        if !is_valid_mass(entry.exact_mass) {
            return Err(DataValidationError::InvalidMass {
                table: TableKind::Reference,
                position: i + 1,
                name: entry.name.clone(),
                mass: entry.exact_mass,
            });
        }
    }

    Ok(())
}

/// Validate observed signals before matching.
///
/// # Errors
///
/// Returns `DataValidationError::EmptyTable` if there are no signals, or
/// `DataValidationError::InvalidMass` for the first signal with a bad mass.
pub fn validate_signals(signals: &[ObservedSignal]) -> Result<(), DataValidationError> {
    if signals.is_empty() {
        return Err(DataValidationError::EmptyTable(TableKind::Signal));
    }

    for (i, signal) in signals.iter().enumerate() {
        if !is_valid_mass(signal.mass) {
            return Err(DataValidationError::InvalidMass {
                table: TableKind::Signal,
                position: i + 1,
                name: signal.name.clone(),
                mass: signal.mass,
            });
        }
    }

    Ok(())
}

/// Validate a ppm tolerance window half-width.
///
/// # Errors
///
/// Returns `DataValidationError::InvalidTolerance` for negative or non-finite values.
pub fn validate_tolerance(tolerance_ppm: f64) -> Result<(), DataValidationError> {
    if tolerance_ppm.is_finite() && tolerance_ppm >= 0.0 {
        Ok(())
    } else {
        Err(DataValidationError::InvalidTolerance(tolerance_ppm))
    }
}

/// Check if adding another row would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new row.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_row_limit(count: usize) -> Option<String> {
    if count >= MAX_TABLE_ROWS {
        Some(format!(
            "Too many rows: adding another would exceed maximum of {MAX_TABLE_ROWS}"
        ))
    } else {
        None
    }
}

/// Parse a mass written as text, optionally with a decimal comma.
///
/// Thousand separators are not supported.
#[must_use]
pub fn parse_mass_text(text: &str, decimal_comma: bool) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if decimal_comma && trimmed.contains(',') {
        trimmed.replace(',', ".").parse().ok()
    } else {
        trimmed.parse().ok()
    }
}

/// Helper function to convert usize count to f64 with explicit precision loss allowance
#[inline]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_references_rejects_empty() {
        assert_eq!(
            validate_references(&[]),
            Err(DataValidationError::EmptyTable(TableKind::Reference))
        );
    }

    #[test]
    fn test_validate_references_rejects_zero_mass() {
        let refs = vec![
            ReferenceEntry::new("PC 34:1", 759.5778),
            ReferenceEntry::new("Broken", 0.0),
        ];

        match validate_references(&refs) {
            Err(DataValidationError::InvalidMass {
                table,
                position,
                name,
                ..
            }) => {
                assert_eq!(table, TableKind::Reference);
                assert_eq!(position, 2);
                assert_eq!(name, "Broken");
            }
            other => panic!("Expected InvalidMass, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_signals_rejects_non_finite() {
        for bad in [f64::NAN, f64::INFINITY, -12.5] {
            let signals = vec![ObservedSignal::new("Sig", bad)];
            assert!(validate_signals(&signals).is_err(), "mass {bad} accepted");
        }
    }

    #[test]
    fn test_validate_tolerance() {
        assert!(validate_tolerance(5.0).is_ok());
        assert!(validate_tolerance(0.0).is_ok());
        assert!(validate_tolerance(-1.0).is_err());
        assert!(validate_tolerance(f64::NAN).is_err());
    }

    #[test]
    fn test_parse_mass_text() {
        assert_eq!(parse_mass_text("760.5851", true), Some(760.5851));
        assert_eq!(parse_mass_text(" 760,5851 ", true), Some(760.5851));
        assert_eq!(parse_mass_text("760,5851", false), None);
        assert_eq!(parse_mass_text("abc", true), None);
        assert_eq!(parse_mass_text("   ", true), None);
    }

    #[test]
    fn test_check_row_limit() {
        assert!(check_row_limit(0).is_none());
        assert!(check_row_limit(MAX_TABLE_ROWS - 1).is_none());
        assert!(check_row_limit(MAX_TABLE_ROWS).is_some());
    }
}

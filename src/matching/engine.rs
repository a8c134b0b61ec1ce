use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::types::{CandidateMatch, ObservedSignal, ReferenceEntry, SignalResult};
use crate::matching::scoring::{ppm_error, within_tolerance};
use crate::utils::validation::{
    validate_references, validate_signals, validate_tolerance, DataValidationError,
};

/// Default half-width of the accepted mass error window, in ppm
pub const DEFAULT_TOLERANCE_PPM: f64 = 5.0;

/// Configuration for the matching engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Candidates with `|ppm| <= tolerance_ppm` are retained
    pub tolerance_ppm: f64,
    /// Evaluate signals on the rayon thread pool
    pub parallel: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            tolerance_ppm: DEFAULT_TOLERANCE_PPM,
            parallel: false,
        }
    }
}

/// Matches observed signals against a validated reference library
#[derive(Debug)]
pub struct MatchingEngine<'a> {
    references: &'a [ReferenceEntry],
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create an engine with a custom configuration
    ///
    /// # Errors
    ///
    /// Returns `DataValidationError` if the reference library is empty,
    /// contains an invalid mass, or the tolerance is negative or non-finite.
    pub fn with_config(
        references: &'a [ReferenceEntry],
        config: MatchingConfig,
    ) -> Result<Self, DataValidationError> {
        validate_tolerance(config.tolerance_ppm)?;
        validate_references(references)?;
        Ok(Self { references, config })
    }

    /// Rank the references within tolerance of one signal.
    ///
    /// The signal mass must already be validated.
    #[must_use]
    pub fn match_signal(&self, signal: &ObservedSignal) -> SignalResult {
        let mut candidates: Vec<CandidateMatch> = self
            .references
            .iter()
            .filter_map(|reference| {
                let confidence_ppm = ppm_error(signal.mass, reference.exact_mass);
                within_tolerance(confidence_ppm, self.config.tolerance_ppm).then(|| {
                    CandidateMatch {
                        reference_name: reference.name.clone(),
                        confidence_ppm,
                    }
                })
            })
            .collect();

        // Stable: equal confidences keep reference-list order
        candidates.sort_by(|a, b| {
            b.confidence_ppm
                .partial_cmp(&a.confidence_ppm)
                .unwrap_or(Ordering::Equal)
        });

        SignalResult::from_ranked(signal, candidates)
    }

    /// Match every signal, returning results in signal input order.
    ///
    /// # Errors
    ///
    /// Returns `DataValidationError` if there are no signals or any signal
    /// mass is invalid. No partial results are returned.
    pub fn match_all(
        &self,
        signals: &[ObservedSignal],
    ) -> Result<Vec<SignalResult>, DataValidationError> {
        validate_signals(signals)?;

        debug!(
            "Matching {} signals against {} references (±{} ppm, parallel: {})",
            signals.len(),
            self.references.len(),
            self.config.tolerance_ppm,
            self.config.parallel
        );

        let results: Vec<SignalResult> = if self.config.parallel {
            signals.par_iter().map(|s| self.match_signal(s)).collect()
        } else {
            signals.iter().map(|s| self.match_signal(s)).collect()
        };

        for result in results.iter().filter(|r| r.is_empty()) {
            warn!(
                "No reference within ±{} ppm of signal '{}' ({})",
                self.config.tolerance_ppm, result.signal_name, result.mass
            );
        }

        Ok(results)
    }
}

/// Match signals against references in one call.
///
/// # Errors
///
/// Returns `DataValidationError` if either table is empty, any mass is
/// invalid, or the tolerance is invalid.
pub fn match_signals(
    references: &[ReferenceEntry],
    signals: &[ObservedSignal],
    config: &MatchingConfig,
) -> Result<Vec<SignalResult>, DataValidationError> {
    MatchingEngine::with_config(references, config.clone())?.match_all(signals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TableKind;

    fn lipid_library() -> Vec<ReferenceEntry> {
        vec![
            ReferenceEntry::new("PC 34:1", 759.5778),
            ReferenceEntry::new("PE 38:4", 767.5465),
            ReferenceEntry::new("LipidA", 760.5851),
            ReferenceEntry::new("PC 34:0", 761.5935),
            ReferenceEntry::new("PS 36:1", 789.5520),
        ]
    }

    #[test]
    fn test_single_close_match() {
        let refs = vec![ReferenceEntry::new("LipidA", 760.5851)];
        let signals = vec![ObservedSignal::new("Sig1", 760.5855)];

        let results = match_signals(&refs, &signals, &MatchingConfig::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].reference_names(), ["LipidA"]);
        let ppm = results[0].confidences()[0];
        assert!((ppm - 0.526).abs() < 0.001, "ppm was {ppm}");
    }

    #[test]
    fn test_far_reference_is_excluded() {
        let refs = vec![ReferenceEntry::new("LipidB", 100.0)];
        let signals = vec![ObservedSignal::new("Sig2", 200.0)];

        let results = match_signals(&refs, &signals, &MatchingConfig::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].signal_name, "Sig2");
        assert!(results[0].is_empty());
        assert!(results[0].confidences().is_empty());
    }

    #[test]
    fn test_ties_keep_reference_order() {
        let refs = vec![
            ReferenceEntry::new("Second", 500.0),
            ReferenceEntry::new("Far", 100.0),
            ReferenceEntry::new("First", 500.0),
        ];
        let signals = vec![ObservedSignal::new("Sig3", 500.001)];

        let results = match_signals(&refs, &signals, &MatchingConfig::default()).unwrap();
        assert_eq!(results[0].reference_names(), ["Second", "First"]);
        assert_eq!(results[0].confidences()[0], results[0].confidences()[1]);
    }

    #[test]
    fn test_zero_reference_mass_fails() {
        let refs = vec![ReferenceEntry::new("LipidA", 760.5851), ReferenceEntry::new("Zero", 0.0)];
        let signals = vec![ObservedSignal::new("Sig1", 760.5855)];

        let err = match_signals(&refs, &signals, &MatchingConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            DataValidationError::InvalidMass {
                table: TableKind::Reference,
                position: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_tables_fail() {
        let refs = lipid_library();
        let config = MatchingConfig::default();
        assert_eq!(
            match_signals(&refs, &[], &config),
            Err(DataValidationError::EmptyTable(TableKind::Signal))
        );
        assert_eq!(
            match_signals(&[], &[ObservedSignal::new("Sig", 1.0)], &config),
            Err(DataValidationError::EmptyTable(TableKind::Reference))
        );
    }

    #[test]
    fn test_ranking_is_descending_and_filtered() {
        let refs = lipid_library();
        let signals = vec![ObservedSignal::new("Sig", 760.5860)];
        let config = MatchingConfig {
            tolerance_ppm: 2000.0,
            parallel: false,
        };

        let results = match_signals(&refs, &signals, &config).unwrap();
        let confidences = results[0].confidences();
        assert_eq!(confidences.len(), results[0].reference_names().len());
        assert!(confidences.windows(2).all(|w| w[0] >= w[1]));
        assert!(confidences.iter().all(|c| c.abs() <= 2000.0));
        // Lightest reference has the largest positive error
        assert_eq!(results[0].reference_names()[0], "PC 34:1");
        // PE 38:4 and PS 36:1 are more than 2000 ppm away
        assert!(!results[0].reference_names().contains(&"PS 36:1".to_string()));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let refs = lipid_library();
        let signals: Vec<ObservedSignal> = (0..200)
            .map(|i| ObservedSignal::new(format!("Sig{i}"), 759.5 + f64::from(i) * 0.01))
            .collect();

        let sequential = match_signals(&refs, &signals, &MatchingConfig::default()).unwrap();
        let parallel = match_signals(
            &refs,
            &signals,
            &MatchingConfig {
                parallel: true,
                ..MatchingConfig::default()
            },
        )
        .unwrap();

        assert_eq!(sequential, parallel);
        let names: Vec<&str> = parallel.iter().map(|r| r.signal_name.as_str()).collect();
        let expected: Vec<String> = (0..200).map(|i| format!("Sig{i}")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_invalid_tolerance_rejected() {
        let refs = lipid_library();
        let config = MatchingConfig {
            tolerance_ppm: -1.0,
            parallel: false,
        };
        assert!(matches!(
            MatchingEngine::with_config(&refs, config),
            Err(DataValidationError::InvalidTolerance(_))
        ));
    }

    #[test]
    fn test_zero_tolerance_keeps_exact_masses_only() {
        let refs = vec![ReferenceEntry::new("Exact", 500.0), ReferenceEntry::new("Near", 500.0001)];
        let signals = vec![ObservedSignal::new("Sig", 500.0)];
        let config = MatchingConfig {
            tolerance_ppm: 0.0,
            parallel: false,
        };

        let results = match_signals(&refs, &signals, &config).unwrap();
        assert_eq!(results[0].reference_names(), ["Exact"]);
    }
}

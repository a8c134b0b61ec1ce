use serde::Serialize;

use crate::core::types::SignalResult;

/// A signal with no reference inside the tolerance window.
///
/// Not an error: "no match" is a valid outcome that is reported alongside
/// the results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyMatchWarning {
    /// 1-based position of the signal in the input table
    pub position: usize,
    pub signal_name: String,
    pub mass: f64,
}

impl std::fmt::Display for EmptyMatchWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "signal '{}' ({}) at position {} has no candidate",
            self.signal_name, self.mass, self.position
        )
    }
}

/// Aggregate counts over one run's results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSummary {
    pub total_signals: usize,
    pub matched_signals: usize,
    pub total_candidates: usize,
    pub unmatched: Vec<EmptyMatchWarning>,
}

impl MatchSummary {
    #[must_use]
    pub fn from_results(results: &[SignalResult]) -> Self {
        let unmatched = results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_empty())
            .map(|(i, r)| EmptyMatchWarning {
                position: i + 1,
                signal_name: r.signal_name.clone(),
                mass: r.mass,
            })
            .collect::<Vec<_>>();

        Self {
            total_signals: results.len(),
            matched_signals: results.len() - unmatched.len(),
            total_candidates: results.iter().map(SignalResult::len).sum(),
            unmatched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CandidateMatch, ObservedSignal};

    #[test]
    fn test_summary_counts_unmatched() {
        let matched = SignalResult::from_ranked(
            &ObservedSignal::new("Sig1", 760.5855),
            vec![
                CandidateMatch {
                    reference_name: "LipidA".to_string(),
                    confidence_ppm: 0.53,
                },
                CandidateMatch {
                    reference_name: "LipidC".to_string(),
                    confidence_ppm: -3.1,
                },
            ],
        );
        let unmatched = SignalResult::from_ranked(&ObservedSignal::new("Sig2", 200.0), Vec::new());

        let summary = MatchSummary::from_results(&[matched, unmatched]);
        assert_eq!(summary.total_signals, 2);
        assert_eq!(summary.matched_signals, 1);
        assert_eq!(summary.total_candidates, 2);
        assert_eq!(summary.unmatched.len(), 1);
        assert_eq!(summary.unmatched[0].position, 2);
        assert_eq!(summary.unmatched[0].signal_name, "Sig2");
        assert_eq!(
            summary.unmatched[0].to_string(),
            "signal 'Sig2' (200) at position 2 has no candidate"
        );
    }
}

use serde::{Deserialize, Serialize};

/// Which input table a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Reference,
    Signal,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reference => write!(f, "reference"),
            Self::Signal => write!(f, "signal"),
        }
    }
}

/// A lipid species from the reference library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Lipid name as written in the library
    pub name: String,

    /// Monoisotopic exact mass in Da
    pub exact_mass: f64,
}

impl ReferenceEntry {
    pub fn new(name: impl Into<String>, exact_mass: f64) -> Self {
        Self {
            name: name.into(),
            exact_mass,
        }
    }
}

/// An experimentally observed mass peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedSignal {
    /// Signal label
    pub name: String,

    /// Observed mass in Da
    pub mass: f64,
}

impl ObservedSignal {
    pub fn new(name: impl Into<String>, mass: f64) -> Self {
        Self {
            name: name.into(),
            mass,
        }
    }
}

/// A reference that falls within tolerance of a signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    pub reference_name: String,

    /// Signed mass error; positive when the signal is heavier than the reference
    pub confidence_ppm: f64,
}

/// Ranked candidates for one observed signal.
///
/// The reference names and confidences are parallel sequences sorted by
/// confidence, highest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    pub signal_name: String,
    pub mass: f64,
    ranked_reference_names: Vec<String>,
    ranked_confidences: Vec<f64>,
}

impl SignalResult {
    /// Build a result from candidates that are already ranked.
    #[must_use]
    pub(crate) fn from_ranked(signal: &ObservedSignal, candidates: Vec<CandidateMatch>) -> Self {
        let (ranked_reference_names, ranked_confidences) = candidates
            .into_iter()
            .map(|c| (c.reference_name, c.confidence_ppm))
            .unzip();

        Self {
            signal_name: signal.name.clone(),
            mass: signal.mass,
            ranked_reference_names,
            ranked_confidences,
        }
    }

    #[must_use]
    pub fn reference_names(&self) -> &[String] {
        &self.ranked_reference_names
    }

    #[must_use]
    pub fn confidences(&self) -> &[f64] {
        &self.ranked_confidences
    }

    /// Number of retained candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranked_confidences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranked_confidences.is_empty()
    }

    /// Best candidate, if any
    #[must_use]
    pub fn best(&self) -> Option<(&str, f64)> {
        self.candidates().next()
    }

    /// Iterate over (reference name, confidence) pairs in rank order
    pub fn candidates(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ranked_reference_names
            .iter()
            .map(String::as_str)
            .zip(self.ranked_confidences.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ranked_keeps_sequences_parallel() {
        let signal = ObservedSignal::new("Sig1", 760.5855);
        let candidates = vec![
            CandidateMatch {
                reference_name: "PC 34:1".to_string(),
                confidence_ppm: 1.5,
            },
            CandidateMatch {
                reference_name: "PE 37:1".to_string(),
                confidence_ppm: -0.25,
            },
        ];

        let result = SignalResult::from_ranked(&signal, candidates);
        assert_eq!(result.signal_name, "Sig1");
        assert_eq!(result.reference_names(), ["PC 34:1", "PE 37:1"]);
        assert_eq!(result.confidences(), [1.5, -0.25]);
        assert_eq!(result.best(), Some(("PC 34:1", 1.5)));
    }

    #[test]
    fn test_empty_result() {
        let signal = ObservedSignal::new("Sig2", 200.0);
        let result = SignalResult::from_ranked(&signal, Vec::new());
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
        assert!(result.best().is_none());
    }

    #[test]
    fn test_table_kind_display() {
        assert_eq!(TableKind::Reference.to_string(), "reference");
        assert_eq!(TableKind::Signal.to_string(), "signal");
    }
}

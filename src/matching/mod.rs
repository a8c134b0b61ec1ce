//! Mass matching engine and ppm scoring.
//!
//! - [`MatchingEngine`]: ranks reference entries against each observed signal
//! - [`match_signals`]: one-shot convenience wrapper
//! - [`MatchSummary`]: counts and the list of signals without candidates
//!
//! ## Algorithm
//!
//! For every (signal, reference) pair the signed ppm error
//! `(signal - reference) / signal * 1e6` is computed. Pairs inside the closed
//! window `[-tolerance, +tolerance]` are kept and sorted by error, highest
//! first. The sort is stable, so references with identical errors appear in
//! library order. Each signal is independent of every other, which lets the
//! engine fan out over rayon while still returning results in input order.
//!
//! ## Example
//!
//! ```rust
//! use lipid_match::{match_signals, MatchingConfig, ObservedSignal, ReferenceEntry};
//!
//! let library = vec![ReferenceEntry::new("PC 34:1", 760.5851)];
//! let signals = vec![ObservedSignal::new("Peak 1", 760.5855)];
//!
//! let results = match_signals(&library, &signals, &MatchingConfig::default()).unwrap();
//! assert_eq!(results[0].reference_names(), ["PC 34:1"]);
//! ```

pub mod engine;
pub mod scoring;
pub mod summary;

pub use engine::{match_signals, MatchingConfig, MatchingEngine, DEFAULT_TOLERANCE_PPM};
pub use summary::{EmptyMatchWarning, MatchSummary};

//! # lipid-match
//!
//! A library for annotating mass-spectrometry signals with lipid species by
//! exact mass.
//!
//! A lipidomics run produces a list of observed signal masses. Each one may
//! correspond to several lipids whose exact masses lie within the
//! instrument's mass accuracy. `lipid-match` compares every signal with every
//! entry of a reference library, keeps the entries inside a ppm tolerance
//! window and ranks them by their signed mass error.
//!
//! ## Features
//!
//! - **ppm scoring**: signed relative error `(observed - reference) / observed * 1e6`
//! - **Deterministic ranking**: stable descending sort, ties keep library order
//! - **Spreadsheet and text input**: xlsx/xls/ods via calamine, CSV/TSV via csv
//! - **Styled output**: an xlsx result sheet with bold headers and fitted columns
//! - **Fail-fast validation**: empty tables and bad masses abort the run
//!
//! ## Example
//!
//! ```rust
//! use lipid_match::{match_signals, MatchingConfig, ObservedSignal, ReferenceEntry};
//!
//! let library = vec![
//!     ReferenceEntry::new("LipidA", 760.5851),
//!     ReferenceEntry::new("LipidB", 100.0),
//! ];
//! let signals = vec![ObservedSignal::new("Sig1", 760.5855)];
//!
//! let results = match_signals(&library, &signals, &MatchingConfig::default()).unwrap();
//! for (name, ppm) in results[0].candidates() {
//!     println!("{name}: {ppm:.2} ppm");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Reference entries, signals and results
//! - [`matching`]: Matching engine and ppm scoring
//! - [`parsing`]: Loaders for spreadsheet and delimited inputs
//! - [`output`]: Result table rendering and writers
//! - [`config`]: Run configuration and JSON overrides
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod config;
pub mod core;
pub mod matching;
pub mod output;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::types::*;
pub use config::RunConfig;
pub use matching::{match_signals, MatchSummary, MatchingConfig, MatchingEngine};
pub use parsing::TableLayout;
pub use utils::validation::DataValidationError;

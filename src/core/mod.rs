//! Core data types for mass-based lipid annotation.
//!
//! - [`ReferenceEntry`]: a lipid species with its exact mass
//! - [`ObservedSignal`]: a measured mass peak to annotate
//! - [`CandidateMatch`]: a reference within tolerance of a signal
//! - [`SignalResult`]: the ranked candidates for one signal
//!
//! ## Sign convention
//!
//! Mass errors are reported as `(observed - reference) / observed * 1e6`,
//! so a positive value means the observed peak is heavier than the
//! reference species.
//!
//! [`ReferenceEntry`]: types::ReferenceEntry
//! [`ObservedSignal`]: types::ObservedSignal
//! [`CandidateMatch`]: types::CandidateMatch
//! [`SignalResult`]: types::SignalResult

pub mod types;

//! Deterministic shuffle service and paper-set generation.

pub mod deterministic;
pub mod paper_set;

pub use deterministic::{fisher_yates, seed_for, shuffle, string_hash, Lcg};
pub use paper_set::{AnswerKeyEntry, PaperSet, PaperSetService};

//! Blueprint-driven question selection with passage-grouping
//! de-duplication.

pub mod selector;

pub use selector::{collapse_passage_groups, QuestionSelector, SelectionOutcome};

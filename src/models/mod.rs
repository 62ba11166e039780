//! Domain records for the exam lifecycle core.
//!
//! All records are tenant-scoped; storage treats a cross-tenant id the same
//! as an unknown one.

pub mod attempt;
pub mod audit;
pub mod blueprint;
pub mod exam;
pub mod passage;
pub mod question;

pub use attempt::{Attempt, AttemptStatus, QuestionState};
pub use audit::ExamAuditLog;
pub use blueprint::{Blueprint, BlueprintSection};
pub use exam::Exam;
pub use passage::Passage;
pub use question::{Difficulty, Question, QuestionType};

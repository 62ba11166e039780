//! Persistence boundary for the exam core.
//!
//! The core never sees a schema: it consumes get/create/update primitives
//! keyed by opaque identifiers. Every lookup is tenant-scoped and a
//! cross-tenant id behaves exactly like an unknown one. The two operations
//! with correctness weight are `compare_and_swap_workflow_state` (keeps the
//! audit trail consistent under concurrent conflicting transitions) and
//! `insert_attempt` (at most one attempt per (exam, student) under racing
//! start calls).

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    Attempt, Blueprint, Difficulty, Exam, ExamAuditLog, Passage, Question, QuestionType,
};
use crate::state_machine::states::WorkflowState;

pub use memory::InMemoryStorage;

/// Filter over the tenant's question pool. The pool query always restricts
/// to verified, assessment-flagged questions; these fields narrow further.
#[derive(Debug, Clone, Default)]
pub struct QuestionPoolFilter {
    pub subject: String,
    pub grade: String,
    pub question_type: Option<QuestionType>,
    /// Restrict to auto-gradable types (online attempt draws).
    pub objective_only: bool,
    /// Exact per-question marks, when the blueprint section pins them.
    pub marks: Option<f64>,
    pub difficulty: Option<Difficulty>,
    pub chapters: Option<Vec<String>>,
}

impl QuestionPoolFilter {
    pub fn new(subject: impl Into<String>, grade: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            grade: grade.into(),
            ..Self::default()
        }
    }

    pub fn matches(&self, question: &Question) -> bool {
        if !question.verified || !question.for_assessment {
            return false;
        }
        if question.subject != self.subject || question.grade != self.grade {
            return false;
        }
        if let Some(qt) = self.question_type {
            if question.question_type != qt {
                return false;
            }
        }
        if self.objective_only && !question.question_type.is_objective() {
            return false;
        }
        if let Some(marks) = self.marks {
            if (question.marks - marks).abs() > 1e-9 {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if question.difficulty != Some(difficulty) {
                return false;
            }
        }
        if let Some(chapters) = &self.chapters {
            match &question.chapter {
                Some(chapter) if chapters.contains(chapter) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Get/create/update primitives the core expects from its persistence
/// collaborator.
#[async_trait]
pub trait ExamStorage: Send + Sync {
    // Exams
    async fn insert_exam(&self, exam: Exam) -> Result<Exam>;
    async fn get_exam(&self, tenant_id: Uuid, exam_id: Uuid) -> Result<Exam>;
    async fn update_exam(&self, exam: Exam) -> Result<Exam>;

    /// Atomically move the workflow state from `expected` to `to`. Fails with
    /// `StateError::StaleTransition` when the stored state is no longer
    /// `expected`, so two conflicting approvals cannot both win.
    async fn compare_and_swap_workflow_state(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        expected: WorkflowState,
        to: WorkflowState,
    ) -> Result<Exam>;

    // Blueprints
    async fn insert_blueprint(&self, blueprint: Blueprint) -> Result<Blueprint>;
    async fn get_blueprint(&self, tenant_id: Uuid, blueprint_id: Uuid) -> Result<Blueprint>;

    // Questions and passages
    async fn insert_question(&self, question: Question) -> Result<Question>;
    /// Fetch by id, preserving the requested order. Unknown or cross-tenant
    /// ids are a NotFound error.
    async fn get_questions(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<Question>>;
    async fn query_question_pool(
        &self,
        tenant_id: Uuid,
        filter: &QuestionPoolFilter,
    ) -> Result<Vec<Question>>;
    async fn insert_passage(&self, passage: Passage) -> Result<Passage>;
    async fn get_passages(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<Passage>>;

    // Attempts
    /// Atomic create enforcing the single-attempt invariant for the
    /// (exam, student) pair: fails with `AttemptAlreadyInProgress` or
    /// `AttemptAlreadyCompleted` instead of inserting a duplicate.
    async fn insert_attempt(&self, attempt: Attempt) -> Result<Attempt>;
    async fn get_attempt(&self, tenant_id: Uuid, attempt_id: Uuid) -> Result<Attempt>;
    async fn update_attempt(&self, attempt: Attempt) -> Result<Attempt>;
    async fn find_in_progress_attempt(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Attempt>>;
    async fn find_completed_attempt(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Attempt>>;

    // Audit trail (append-only)
    async fn append_audit_log(&self, entry: ExamAuditLog) -> Result<()>;
    async fn list_audit_logs(&self, tenant_id: Uuid, exam_id: Uuid) -> Result<Vec<ExamAuditLog>>;
}

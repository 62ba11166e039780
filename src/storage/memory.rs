//! In-memory `ExamStorage` backed by `DashMap`s.
//!
//! Backs every test in the crate and any embedding that supplies no external
//! database. The attempt index holds its shard entry across the
//! check-then-insert sequence, which is what makes `insert_attempt` atomic
//! for a given (exam, student) pair; `compare_and_swap_workflow_state` does
//! the same through `get_mut` on the exam row.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{ExamCoreError, Result, StateError};
use crate::models::{Attempt, AttemptStatus, Blueprint, Exam, ExamAuditLog, Passage, Question};
use crate::state_machine::states::WorkflowState;

use super::{ExamStorage, QuestionPoolFilter};

#[derive(Debug, Default)]
pub struct InMemoryStorage {
    exams: DashMap<Uuid, Exam>,
    blueprints: DashMap<Uuid, Blueprint>,
    questions: DashMap<Uuid, Question>,
    passages: DashMap<Uuid, Passage>,
    attempts: DashMap<Uuid, Attempt>,
    /// (exam_id, student_id) -> attempt ids, the uniqueness guard.
    attempt_index: DashMap<(Uuid, Uuid), Vec<Uuid>>,
    audit_logs: DashMap<Uuid, Vec<ExamAuditLog>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn attempt_for_pair(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
        predicate: impl Fn(&Attempt) -> bool,
    ) -> Option<Attempt> {
        let ids = self.attempt_index.get(&(exam_id, student_id))?;
        ids.iter().find_map(|id| {
            self.attempts
                .get(id)
                .filter(|a| a.tenant_id == tenant_id && predicate(a))
                .map(|a| a.clone())
        })
    }
}

#[async_trait]
impl ExamStorage for InMemoryStorage {
    async fn insert_exam(&self, exam: Exam) -> Result<Exam> {
        self.exams.insert(exam.id, exam.clone());
        Ok(exam)
    }

    async fn get_exam(&self, tenant_id: Uuid, exam_id: Uuid) -> Result<Exam> {
        self.exams
            .get(&exam_id)
            .filter(|e| e.tenant_id == tenant_id)
            .map(|e| e.clone())
            .ok_or_else(|| ExamCoreError::not_found("exam", exam_id))
    }

    async fn update_exam(&self, exam: Exam) -> Result<Exam> {
        let mut stored = self
            .exams
            .get_mut(&exam.id)
            .filter(|e| e.tenant_id == exam.tenant_id)
            .ok_or_else(|| ExamCoreError::not_found("exam", exam.id))?;
        *stored = exam.clone();
        Ok(exam)
    }

    async fn compare_and_swap_workflow_state(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        expected: WorkflowState,
        to: WorkflowState,
    ) -> Result<Exam> {
        let mut stored = self
            .exams
            .get_mut(&exam_id)
            .filter(|e| e.tenant_id == tenant_id)
            .ok_or_else(|| ExamCoreError::not_found("exam", exam_id))?;

        if stored.workflow_state != expected {
            return Err(StateError::StaleTransition {
                expected,
                actual: stored.workflow_state,
            }
            .into());
        }

        stored.workflow_state = to;
        stored.updated_at = chrono::Utc::now();
        Ok(stored.clone())
    }

    async fn insert_blueprint(&self, blueprint: Blueprint) -> Result<Blueprint> {
        self.blueprints.insert(blueprint.id, blueprint.clone());
        Ok(blueprint)
    }

    async fn get_blueprint(&self, tenant_id: Uuid, blueprint_id: Uuid) -> Result<Blueprint> {
        self.blueprints
            .get(&blueprint_id)
            .filter(|b| b.tenant_id == tenant_id)
            .map(|b| b.clone())
            .ok_or_else(|| ExamCoreError::not_found("blueprint", blueprint_id))
    }

    async fn insert_question(&self, question: Question) -> Result<Question> {
        self.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn get_questions(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<Question>> {
        ids.iter()
            .map(|id| {
                self.questions
                    .get(id)
                    .filter(|q| q.tenant_id == tenant_id)
                    .map(|q| q.clone())
                    .ok_or_else(|| ExamCoreError::not_found("question", *id))
            })
            .collect()
    }

    async fn query_question_pool(
        &self,
        tenant_id: Uuid,
        filter: &QuestionPoolFilter,
    ) -> Result<Vec<Question>> {
        let mut pool: Vec<Question> = self
            .questions
            .iter()
            .filter(|q| q.tenant_id == tenant_id && filter.matches(q))
            .map(|q| q.clone())
            .collect();
        // DashMap iteration order is nondeterministic; keep the pool stable
        // so selection randomness is the only randomness.
        pool.sort_by_key(|q| q.id);
        Ok(pool)
    }

    async fn insert_passage(&self, passage: Passage) -> Result<Passage> {
        self.passages.insert(passage.id, passage.clone());
        Ok(passage)
    }

    async fn get_passages(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<Passage>> {
        ids.iter()
            .map(|id| {
                self.passages
                    .get(id)
                    .filter(|p| p.tenant_id == tenant_id)
                    .map(|p| p.clone())
                    .ok_or_else(|| ExamCoreError::not_found("passage", *id))
            })
            .collect()
    }

    async fn insert_attempt(&self, attempt: Attempt) -> Result<Attempt> {
        let key = (attempt.exam_id, attempt.student_id);
        // The entry guard pins the index shard: a racing insert for the same
        // pair blocks here until the winner has recorded its attempt.
        let mut index = self.attempt_index.entry(key).or_default();

        for existing_id in index.iter() {
            if let Some(existing) = self.attempts.get(existing_id) {
                if existing.status.is_completed() {
                    return Err(StateError::AttemptAlreadyCompleted {
                        exam_id: attempt.exam_id,
                        student_id: attempt.student_id,
                    }
                    .into());
                }
                if existing.status == AttemptStatus::InProgress {
                    return Err(StateError::AttemptAlreadyInProgress {
                        exam_id: attempt.exam_id,
                        student_id: attempt.student_id,
                    }
                    .into());
                }
            }
        }

        index.push(attempt.id);
        self.attempts.insert(attempt.id, attempt.clone());
        Ok(attempt)
    }

    async fn get_attempt(&self, tenant_id: Uuid, attempt_id: Uuid) -> Result<Attempt> {
        self.attempts
            .get(&attempt_id)
            .filter(|a| a.tenant_id == tenant_id)
            .map(|a| a.clone())
            .ok_or_else(|| ExamCoreError::not_found("attempt", attempt_id))
    }

    async fn update_attempt(&self, attempt: Attempt) -> Result<Attempt> {
        let mut stored = self
            .attempts
            .get_mut(&attempt.id)
            .filter(|a| a.tenant_id == attempt.tenant_id)
            .ok_or_else(|| ExamCoreError::not_found("attempt", attempt.id))?;
        *stored = attempt.clone();
        Ok(attempt)
    }

    async fn find_in_progress_attempt(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Attempt>> {
        Ok(self.attempt_for_pair(tenant_id, exam_id, student_id, |a| {
            a.status == AttemptStatus::InProgress
        }))
    }

    async fn find_completed_attempt(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Attempt>> {
        Ok(self.attempt_for_pair(tenant_id, exam_id, student_id, |a| a.status.is_completed()))
    }

    async fn append_audit_log(&self, entry: ExamAuditLog) -> Result<()> {
        self.audit_logs.entry(entry.exam_id).or_default().push(entry);
        Ok(())
    }

    async fn list_audit_logs(&self, tenant_id: Uuid, exam_id: Uuid) -> Result<Vec<ExamAuditLog>> {
        Ok(self
            .audit_logs
            .get(&exam_id)
            .map(|logs| {
                logs.iter()
                    .filter(|l| l.tenant_id == tenant_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

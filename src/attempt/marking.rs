use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ExamCoreError, Result, StateError};
use crate::events::{names, EventPublisher};
use crate::models::AttemptStatus;
use crate::storage::ExamStorage;

use super::engine::percentage_of;

/// Final grading summary after manual marking.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeOutcome {
    pub score: f64,
    pub total: f64,
    pub percentage: f64,
}

/// Merges human-assigned scores for subjective questions into a submitted
/// attempt and finalizes grading.
pub struct MarkingCoordinator {
    storage: Arc<dyn ExamStorage>,
    events: EventPublisher,
}

impl MarkingCoordinator {
    pub fn new(storage: Arc<dyn ExamStorage>, events: EventPublisher) -> Self {
        Self { storage, events }
    }

    /// Idempotent overwrite of one manual-score entry. Does not touch the
    /// aggregate; `finalize` recomputes it.
    pub async fn mark_question(
        &self,
        tenant_id: Uuid,
        attempt_id: Uuid,
        question_id: Uuid,
        score: f64,
    ) -> Result<()> {
        let mut attempt = self.storage.get_attempt(tenant_id, attempt_id).await?;
        if !attempt.status.is_completed() {
            return Err(StateError::AttemptNotSubmitted {
                attempt_id,
                status: attempt.status.to_string(),
            }
            .into());
        }
        if !attempt.is_assigned(question_id) {
            return Err(ExamCoreError::Validation(format!(
                "question {question_id} is not assigned to attempt {attempt_id}"
            )));
        }

        let questions = self.storage.get_questions(tenant_id, &[question_id]).await?;
        let question = questions
            .first()
            .ok_or_else(|| ExamCoreError::not_found("question", question_id))?;
        if !question.question_type.is_subjective() {
            return Err(ExamCoreError::Validation(format!(
                "question {question_id} is objective and was auto-scored"
            )));
        }
        if score < 0.0 || score > question.marks {
            return Err(ExamCoreError::Validation(format!(
                "score {score} is outside [0, {}] for question {question_id}",
                question.marks
            )));
        }

        attempt.manual_scores.insert(question_id, score);
        self.storage.update_attempt(attempt).await?;
        Ok(())
    }

    /// Aggregate auto and manual scores, recompute the percentage against
    /// the exam's total marks, and mark the attempt graded. Re-invoking
    /// against the same stored inputs recomputes to the same result.
    pub async fn finalize(
        &self,
        tenant_id: Uuid,
        attempt_id: Uuid,
        remarks: Option<String>,
    ) -> Result<FinalizeOutcome> {
        let mut attempt = self.storage.get_attempt(tenant_id, attempt_id).await?;
        if !attempt.status.is_completed() {
            return Err(StateError::AttemptNotSubmitted {
                attempt_id,
                status: attempt.status.to_string(),
            }
            .into());
        }

        let exam = self.storage.get_exam(tenant_id, attempt.exam_id).await?;

        let manual_total: f64 = attempt.manual_scores.values().sum();
        let aggregate = attempt.auto_score + manual_total;
        let percentage = percentage_of(aggregate, exam.total_marks);

        attempt.score = aggregate;
        attempt.percentage = percentage;
        attempt.needs_manual_marking = false;
        attempt.status = AttemptStatus::Marked;
        attempt.marked_at = Some(chrono::Utc::now());
        if remarks.is_some() {
            attempt.remarks = remarks;
        }
        let attempt = self.storage.update_attempt(attempt).await?;

        tracing::info!(
            attempt_id = %attempt.id,
            exam_id = %attempt.exam_id,
            score = aggregate,
            percentage = percentage,
            "manual marking finalized"
        );

        self.events
            .publish_or_log(
                names::RESULT_PUBLISHED,
                json!({
                    "attempt_id": attempt.id,
                    "exam_id": attempt.exam_id,
                    "student_id": attempt.student_id,
                    "score": aggregate,
                    "total": exam.total_marks,
                    "percentage": percentage,
                }),
            )
            .await;

        Ok(FinalizeOutcome {
            score: aggregate,
            total: exam.total_marks,
            percentage,
        })
    }
}

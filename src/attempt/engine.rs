use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::CoreConfig;
use crate::error::{ExamCoreError, Result, StateError};
use crate::events::{names, EventPublisher};
use crate::models::{Attempt, AttemptStatus, Passage, Question, QuestionState};
use crate::selection::{collapse_passage_groups, QuestionSelector};
use crate::shuffle::{fisher_yates, Lcg};
use crate::storage::ExamStorage;

/// A question re-hydrated with its passage text for client display.
#[derive(Debug, Clone)]
pub struct HydratedQuestion {
    pub question: Question,
    pub passage: Option<Passage>,
}

/// What a start call hands back: the attempt (new or resumed), the hydrated
/// paper, and the applicable duration.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    pub attempt: Attempt,
    pub questions: Vec<HydratedQuestion>,
    pub duration_seconds: i64,
    pub resumed: bool,
}

/// Client checkpoint for an autosave call.
#[derive(Debug, Clone, Default)]
pub struct SaveStatePayload {
    pub answers: HashMap<Uuid, String>,
    pub question_states: HashMap<Uuid, QuestionState>,
    pub marked_for_review: HashSet<Uuid>,
    pub time_remaining_seconds: i64,
}

/// Grading summary returned by submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub score: f64,
    pub total: f64,
    pub percentage: f64,
    pub needs_manual_marking: bool,
}

/// Owns the start/resume/save/submit lifecycle of a student's exam session
/// plus objective auto-scoring.
pub struct AttemptEngine {
    storage: Arc<dyn ExamStorage>,
    selector: QuestionSelector,
    events: EventPublisher,
    fallback_question_count: usize,
}

impl AttemptEngine {
    pub fn new(storage: Arc<dyn ExamStorage>, events: EventPublisher, config: &CoreConfig) -> Self {
        let selector = QuestionSelector::new(Arc::clone(&storage));
        Self {
            storage,
            selector,
            events,
            fallback_question_count: config.fallback_question_count,
        }
    }

    /// Idempotent entry point for a student's session.
    ///
    /// Resumes an in-progress attempt unchanged, refuses a pair that already
    /// completed, and otherwise creates exactly one new attempt even under
    /// racing calls (the storage insert is the atomic arbiter; a loser of
    /// that race resumes the winner's attempt).
    pub async fn start_exam(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<StartOutcome> {
        let exam = self.storage.get_exam(tenant_id, exam_id).await?;

        if !exam.workflow_state.can_start_attempt(exam.is_active) {
            return Err(StateError::ExamNotStartable {
                exam_id,
                state: exam.workflow_state,
                is_active: exam.is_active,
            }
            .into());
        }

        if let Some(attempt) = self
            .storage
            .find_in_progress_attempt(tenant_id, exam_id, student_id)
            .await?
        {
            let questions = self.hydrate(tenant_id, &attempt.question_ids).await?;
            return Ok(StartOutcome {
                questions,
                duration_seconds: exam.duration_seconds(),
                resumed: true,
                attempt,
            });
        }

        if self
            .storage
            .find_completed_attempt(tenant_id, exam_id, student_id)
            .await?
            .is_some()
        {
            return Err(StateError::AttemptAlreadyCompleted { exam_id, student_id }.into());
        }

        let question_ids = self.resolve_question_set(&exam).await?;
        if question_ids.is_empty() {
            return Err(ExamCoreError::Validation(format!(
                "no objective questions available for exam {exam_id}"
            )));
        }

        let attempt = Attempt::start(
            tenant_id,
            exam_id,
            student_id,
            question_ids,
            exam.duration_seconds(),
        );

        let attempt = match self.storage.insert_attempt(attempt).await {
            Ok(attempt) => attempt,
            // Lost the creation race; the winner's attempt is the session.
            Err(ExamCoreError::State(StateError::AttemptAlreadyInProgress { .. })) => self
                .storage
                .find_in_progress_attempt(tenant_id, exam_id, student_id)
                .await?
                .ok_or_else(|| ExamCoreError::not_found("attempt", exam_id))?,
            Err(err) => return Err(err),
        };

        tracing::info!(
            exam_id = %exam_id,
            student_id = %student_id,
            attempt_id = %attempt.id,
            questions = attempt.question_ids.len(),
            "attempt started"
        );

        let questions = self.hydrate(tenant_id, &attempt.question_ids).await?;
        Ok(StartOutcome {
            questions,
            duration_seconds: exam.duration_seconds(),
            resumed: false,
            attempt,
        })
    }

    /// Unconditional state replace for client-driven autosave. Never moves
    /// the attempt out of `in_progress`.
    pub async fn save_state(
        &self,
        tenant_id: Uuid,
        attempt_id: Uuid,
        payload: SaveStatePayload,
    ) -> Result<Attempt> {
        let mut attempt = self.storage.get_attempt(tenant_id, attempt_id).await?;
        if attempt.status != AttemptStatus::InProgress {
            return Err(StateError::AttemptNotInProgress {
                attempt_id,
                status: attempt.status.to_string(),
            }
            .into());
        }

        attempt.answers = payload.answers;
        attempt.question_states = payload.question_states;
        attempt.marked_for_review = payload.marked_for_review;
        attempt.time_remaining_seconds = payload.time_remaining_seconds;
        self.storage.update_attempt(attempt).await
    }

    /// Grade and close the attempt.
    ///
    /// Objective answers are matched case-insensitively after trimming;
    /// subjective questions contribute zero and flag the attempt for manual
    /// marking. An all-objective attempt goes straight to `marked`.
    pub async fn submit_exam(
        &self,
        tenant_id: Uuid,
        attempt_id: Uuid,
        answers: HashMap<Uuid, String>,
    ) -> Result<SubmitOutcome> {
        let mut attempt = self.storage.get_attempt(tenant_id, attempt_id).await?;
        if attempt.status != AttemptStatus::InProgress {
            return Err(StateError::AttemptNotInProgress {
                attempt_id,
                status: attempt.status.to_string(),
            }
            .into());
        }

        let exam = self.storage.get_exam(tenant_id, attempt.exam_id).await?;
        let questions = self
            .storage
            .get_questions(tenant_id, &attempt.question_ids)
            .await?;

        let mut auto_score = 0.0;
        let mut needs_manual_marking = false;
        for question in &questions {
            if question.question_type.is_subjective() {
                needs_manual_marking = true;
                continue;
            }
            let Some(given) = answers.get(&question.id) else {
                continue;
            };
            let Some(expected) = &question.correct_answer else {
                continue;
            };
            if answers_match(expected, given) {
                auto_score += question.marks;
            }
        }

        let total = exam.total_marks;
        let percentage = percentage_of(auto_score, total);
        let now = chrono::Utc::now();

        attempt.answers = answers;
        attempt.auto_score = auto_score;
        attempt.score = auto_score;
        attempt.percentage = percentage;
        attempt.needs_manual_marking = needs_manual_marking;
        attempt.submitted_at = Some(now);
        if needs_manual_marking {
            attempt.status = AttemptStatus::Submitted;
        } else {
            attempt.status = AttemptStatus::Marked;
            attempt.marked_at = Some(now);
        }
        let attempt = self.storage.update_attempt(attempt).await?;

        tracing::info!(
            attempt_id = %attempt.id,
            exam_id = %attempt.exam_id,
            score = auto_score,
            total = total,
            needs_manual_marking = needs_manual_marking,
            "attempt submitted"
        );

        self.events
            .publish_or_log(
                names::EXAM_SUBMITTED,
                json!({
                    "attempt_id": attempt.id,
                    "exam_id": attempt.exam_id,
                    "student_id": attempt.student_id,
                    "score": auto_score,
                    "total": total,
                    "percentage": percentage,
                    "needs_manual_marking": needs_manual_marking,
                }),
            )
            .await;

        Ok(SubmitOutcome {
            score: auto_score,
            total,
            percentage,
            needs_manual_marking,
        })
    }

    /// Existence check over completed attempts. Gates re-attempt blocking
    /// and result visibility.
    pub async fn has_completed_attempt(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool> {
        Ok(self
            .storage
            .find_completed_attempt(tenant_id, exam_id, student_id)
            .await?
            .is_some())
    }

    /// The completed attempt for a pair, or NotFound when nothing has been
    /// submitted yet.
    pub async fn get_result(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
    ) -> Result<Attempt> {
        self.storage
            .find_completed_attempt(tenant_id, exam_id, student_id)
            .await?
            .ok_or_else(|| ExamCoreError::not_found("result", exam_id))
    }

    /// The paper for a new attempt: the exam's pre-assigned list filtered to
    /// objective types and regrouped by passage, or a fresh objective-only
    /// draw when nothing is pre-assigned.
    async fn resolve_question_set(&self, exam: &crate::models::Exam) -> Result<Vec<Uuid>> {
        let mut rng = Lcg::from_entropy();

        let questions = if exam.assigned_question_ids.is_empty() {
            self.selector
                .draw_objective_pool(
                    exam.tenant_id,
                    &exam.subject,
                    &exam.grade,
                    self.fallback_question_count,
                )
                .await?
        } else {
            let assigned = self
                .storage
                .get_questions(exam.tenant_id, &exam.assigned_question_ids)
                .await?;
            let objective: Vec<Question> = assigned
                .into_iter()
                .filter(|q| q.question_type.is_objective())
                .collect();
            let mut grouped = collapse_passage_groups(objective, &mut rng);
            fisher_yates(&mut grouped, &mut rng);
            grouped
        };

        Ok(questions.into_iter().map(|q| q.id).collect())
    }

    async fn hydrate(&self, tenant_id: Uuid, ids: &[Uuid]) -> Result<Vec<HydratedQuestion>> {
        let questions = self.storage.get_questions(tenant_id, ids).await?;

        let passage_ids: Vec<Uuid> = {
            let mut seen = HashSet::new();
            questions
                .iter()
                .filter_map(|q| q.passage_id)
                .filter(|id| seen.insert(*id))
                .collect()
        };
        let passages = if passage_ids.is_empty() {
            Vec::new()
        } else {
            self.storage.get_passages(tenant_id, &passage_ids).await?
        };
        let by_id: HashMap<Uuid, Passage> = passages.into_iter().map(|p| (p.id, p)).collect();

        Ok(questions
            .into_iter()
            .map(|question| {
                let passage = question.passage_id.and_then(|id| by_id.get(&id).cloned());
                HydratedQuestion { question, passage }
            })
            .collect())
    }
}

/// Case-insensitive, whitespace-trimmed exact match.
pub(crate) fn answers_match(expected: &str, given: &str) -> bool {
    expected.trim().eq_ignore_ascii_case(given.trim())
}

/// Percentage against `total`, rounded to two decimal places. A zero-mark
/// exam reports zero rather than dividing by it.
pub(crate) fn percentage_of(score: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    ((score / total) * 100.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers_match_ignores_case_and_whitespace() {
        assert!(answers_match("Paris", "  paris "));
        assert!(answers_match(" TRUE", "true"));
        assert!(!answers_match("a", "b"));
        assert!(!answers_match("42", "4 2"));
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        assert!((percentage_of(1.0, 3.0) - 33.33).abs() < 1e-9);
        assert!((percentage_of(2.0, 3.0) - 66.67).abs() < 1e-9);
        assert!((percentage_of(2.0, 2.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_of_zero_total_is_zero() {
        assert_eq!(percentage_of(5.0, 0.0), 0.0);
    }
}

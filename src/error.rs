use thiserror::Error;
use uuid::Uuid;

use crate::state_machine::states::WorkflowState;

/// Crate-wide error type covering the three domain error categories plus the
/// persistence boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExamCoreError {
    /// Malformed input. Reported immediately, never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// Illegal workflow transition or attempt-lifecycle violation.
    #[error(transparent)]
    State(#[from] StateError),

    /// Unknown exam/attempt/question/passage/blueprint id, including ids that
    /// exist but belong to another tenant.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Failure inside the persistence collaborator.
    #[error("storage error: {0}")]
    Storage(String),

    /// Malformed runtime configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Structured reasons for state violations. The workflow reasons keep
/// "illegal destination" and "unauthorized role" distinguishable for callers
/// that surface them to users.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("cannot transition from '{from}' to '{to}': '{to}' is not an allowed destination")]
    IllegalDestination { from: WorkflowState, to: WorkflowState },

    #[error("role '{role}' is not authorized to transition an exam out of '{from}'")]
    UnauthorizedRole { from: WorkflowState, role: String },

    /// Compare-and-swap failure: the exam moved under us between read and write.
    #[error("workflow state changed concurrently: expected '{expected}', found '{actual}'")]
    StaleTransition { expected: WorkflowState, actual: WorkflowState },

    #[error("exam {exam_id} is not open for attempts (state '{state}', active={is_active})")]
    ExamNotStartable { exam_id: Uuid, state: WorkflowState, is_active: bool },

    #[error("student {student_id} has already completed exam {exam_id}")]
    AttemptAlreadyCompleted { exam_id: Uuid, student_id: Uuid },

    #[error("student {student_id} already has an attempt in progress for exam {exam_id}")]
    AttemptAlreadyInProgress { exam_id: Uuid, student_id: Uuid },

    #[error("attempt {attempt_id} is not in progress (status '{status}')")]
    AttemptNotInProgress { attempt_id: Uuid, status: String },

    #[error("attempt {attempt_id} has not been submitted yet (status '{status}')")]
    AttemptNotSubmitted { attempt_id: Uuid, status: String },
}

pub type Result<T> = std::result::Result<T, ExamCoreError>;

impl ExamCoreError {
    /// Convenience constructor for id lookups that missed.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_error_messages_distinguish_destination_from_role() {
        let dest = StateError::IllegalDestination {
            from: WorkflowState::Draft,
            to: WorkflowState::Active,
        };
        let role = StateError::UnauthorizedRole {
            from: WorkflowState::PendingHod,
            role: "teacher".to_string(),
        };

        assert!(dest.to_string().contains("not an allowed destination"));
        assert!(role.to_string().contains("not authorized"));
        assert_ne!(dest.to_string(), role.to_string());
    }

    #[test]
    fn not_found_carries_kind_and_id() {
        let err = ExamCoreError::not_found("exam", "abc-123");
        assert_eq!(err.to_string(), "exam not found: abc-123");
    }
}

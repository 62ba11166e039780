use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state_machine::states::WorkflowState;

/// An exam definition moving through the approval workflow.
///
/// `workflow_state` is only ever mutated through the workflow governor's
/// compare-and-swap path; once `Archived` the record is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub subject: String,
    pub grade: String,
    pub total_marks: f64,
    pub duration_minutes: i64,
    /// Drawing plan used at authoring time, when the paper is blueprint-built.
    pub blueprint_id: Option<Uuid>,
    /// Pre-assigned paper. When empty, online attempts draw a fresh
    /// objective-only set from the pool.
    pub assigned_question_ids: Vec<Uuid>,
    pub workflow_state: WorkflowState,
    /// Operational on/off switch, independent of the workflow state. Both
    /// must be open for a student to start an attempt.
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exam {
    /// New draft exam owned by `created_by`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        title: impl Into<String>,
        subject: impl Into<String>,
        grade: impl Into<String>,
        total_marks: f64,
        duration_minutes: i64,
        created_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            title: title.into(),
            subject: subject.into(),
            grade: grade.into(),
            total_marks,
            duration_minutes,
            blueprint_id: None,
            assigned_question_ids: Vec::new(),
            workflow_state: WorkflowState::default(),
            is_active: false,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        self.duration_minutes * 60
    }

    pub fn is_archived(&self) -> bool {
        self.workflow_state.is_terminal()
    }
}

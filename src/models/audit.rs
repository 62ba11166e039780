use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state_machine::roles::{Actor, ActorRole};
use crate::state_machine::states::WorkflowState;

/// Append-only record of one accepted workflow transition.
///
/// Rejected transitions never produce a row; rows are never mutated or
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamAuditLog {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub exam_id: Uuid,
    pub from_state: Option<WorkflowState>,
    pub to_state: WorkflowState,
    pub actor_id: Uuid,
    pub actor_role: ActorRole,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ExamAuditLog {
    pub fn record(
        tenant_id: Uuid,
        exam_id: Uuid,
        from_state: Option<WorkflowState>,
        to_state: WorkflowState,
        actor: &Actor,
        comments: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            exam_id,
            from_state,
            to_state,
            actor_id: actor.id,
            actor_role: actor.role,
            comments,
            created_at: Utc::now(),
        }
    }
}

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::events::{names, EventPublisher};
use crate::models::{Exam, ExamAuditLog};
use crate::storage::ExamStorage;

use super::roles::{Actor, ActorRole};
use super::states::WorkflowState;
use super::transitions::{can_transition, TransitionCheck};

/// Role-gated finite-state machine over an exam's approval workflow.
///
/// Accepted transitions persist through a compare-and-swap on the stored
/// state and append exactly one audit row; rejected transitions persist
/// nothing and surface the reason.
pub struct WorkflowGovernor {
    storage: Arc<dyn ExamStorage>,
    events: EventPublisher,
}

impl WorkflowGovernor {
    pub fn new(storage: Arc<dyn ExamStorage>, events: EventPublisher) -> Self {
        Self { storage, events }
    }

    /// Pure validity check; `None` for `from` is read as draft.
    pub fn can_transition_to(
        &self,
        from: Option<WorkflowState>,
        to: WorkflowState,
        role: ActorRole,
    ) -> TransitionCheck {
        can_transition(from, to, role)
    }

    /// Attempt to move an exam to `to` on behalf of `actor`.
    ///
    /// Concurrent conflicting transitions (say, a simultaneous approve and
    /// reject) are serialized by the storage CAS: the loser observes a
    /// `StaleTransition` instead of silently overwriting, keeping the audit
    /// trail consistent with the actual state.
    pub async fn transition(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        to: WorkflowState,
        actor: &Actor,
        comments: Option<String>,
    ) -> Result<Exam> {
        let exam = self.storage.get_exam(tenant_id, exam_id).await?;
        let from = exam.workflow_state;

        self.can_transition_to(Some(from), to, actor.role)
            .into_result()?;

        let updated = self
            .storage
            .compare_and_swap_workflow_state(tenant_id, exam_id, from, to)
            .await?;

        let entry = ExamAuditLog::record(tenant_id, exam_id, Some(from), to, actor, comments);
        self.storage.append_audit_log(entry).await?;

        tracing::info!(
            exam_id = %exam_id,
            from = %from,
            to = %to,
            actor_role = %actor.role,
            "workflow transition accepted"
        );

        self.events
            .publish_or_log(
                names::WORKFLOW_TRANSITIONED,
                json!({
                    "exam_id": exam_id,
                    "tenant_id": tenant_id,
                    "from": from.to_string(),
                    "to": to.to_string(),
                    "actor_id": actor.id,
                    "actor_role": actor.role.to_string(),
                }),
            )
            .await;

        Ok(updated)
    }

    /// Ordered audit trail for an exam.
    pub async fn history(&self, tenant_id: Uuid, exam_id: Uuid) -> Result<Vec<ExamAuditLog>> {
        self.storage.list_audit_logs(tenant_id, exam_id).await
    }
}

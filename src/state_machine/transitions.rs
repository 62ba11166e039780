//! The exam workflow transition table.
//!
//! Single source of truth for which destinations each state allows and which
//! roles may initiate a move out of it. Everything the governor and the
//! derived predicates decide flows from this table.

use super::roles::ActorRole;
use super::states::WorkflowState;
use crate::error::StateError;

/// One row of the workflow table: the destinations reachable from `from` and
/// the roles permitted to initiate any of those moves.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub from: WorkflowState,
    pub destinations: &'static [WorkflowState],
    pub roles: &'static [ActorRole],
}

use ActorRole::*;
use WorkflowState::*;

/// The full approval pipeline. `Archived` has no outgoing row content.
pub const TRANSITION_TABLE: [TransitionRule; 12] = [
    TransitionRule {
        from: Draft,
        destinations: &[Submitted],
        roles: &[Teacher, SchoolAdmin],
    },
    TransitionRule {
        from: Submitted,
        destinations: &[PendingHod, Draft],
        roles: &[Teacher, SchoolAdmin],
    },
    TransitionRule {
        from: PendingHod,
        destinations: &[HodApproved, HodRejected],
        roles: &[Hod],
    },
    TransitionRule {
        from: HodApproved,
        destinations: &[PendingPrincipal, SentToCommittee, Active],
        roles: &[Hod, SchoolAdmin],
    },
    TransitionRule {
        from: HodRejected,
        destinations: &[Submitted],
        roles: &[Teacher],
    },
    TransitionRule {
        from: PendingPrincipal,
        destinations: &[PrincipalApproved, PrincipalRejected],
        roles: &[Principal],
    },
    TransitionRule {
        from: PrincipalApproved,
        destinations: &[SentToCommittee, Active],
        roles: &[Principal, SchoolAdmin],
    },
    TransitionRule {
        from: PrincipalRejected,
        destinations: &[Submitted],
        roles: &[Teacher],
    },
    TransitionRule {
        from: SentToCommittee,
        destinations: &[Active],
        roles: &[ExamCommittee, SchoolAdmin],
    },
    TransitionRule {
        from: Active,
        destinations: &[Locked, Archived],
        roles: &[SchoolAdmin, ExamCommittee],
    },
    TransitionRule {
        from: Locked,
        destinations: &[Active, Archived],
        roles: &[SchoolAdmin],
    },
    TransitionRule {
        from: Archived,
        destinations: &[],
        roles: &[],
    },
];

/// Look up the table row for a state. Rows are laid out in state-declaration
/// order, so this is a direct index.
pub fn rule_for(state: WorkflowState) -> &'static TransitionRule {
    let rule = &TRANSITION_TABLE[state as usize];
    debug_assert_eq!(rule.from, state);
    rule
}

pub fn allowed_destinations(state: WorkflowState) -> &'static [WorkflowState] {
    rule_for(state).destinations
}

pub fn permitted_roles(state: WorkflowState) -> &'static [ActorRole] {
    rule_for(state).roles
}

/// Outcome of a transition validity check.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionCheck {
    Valid,
    Invalid(StateError),
}

impl TransitionCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// The human-readable rejection reason, if any.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::Invalid(err) => Some(err.to_string()),
        }
    }

    pub fn into_result(self) -> Result<(), StateError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(err) => Err(err),
        }
    }
}

/// Pure validity check for a proposed transition.
///
/// A missing `from` is read as `Draft`. The destination check runs first, so
/// an unauthorized role against an illegal destination reports the
/// destination problem. The privileged role bypasses the role set only.
pub fn can_transition(
    from: Option<WorkflowState>,
    to: WorkflowState,
    role: ActorRole,
) -> TransitionCheck {
    let from = from.unwrap_or_default();
    let rule = rule_for(from);

    if !rule.destinations.contains(&to) {
        return TransitionCheck::Invalid(StateError::IllegalDestination { from, to });
    }

    if !role.is_privileged() && !rule.roles.contains(&role) {
        return TransitionCheck::Invalid(StateError::UnauthorizedRole {
            from,
            role: role.to_string(),
        });
    }

    TransitionCheck::Valid
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exam workflow states covering the full approval pipeline.
///
/// `Archived` is terminal: no outgoing transitions exist for any role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// Initial state when an exam is authored
    Draft,
    /// Author has submitted the exam for review
    Submitted,
    /// Awaiting head-of-department review
    PendingHod,
    /// Approved by the head of department
    HodApproved,
    /// Rejected by the head of department, returned for rework
    HodRejected,
    /// Awaiting principal review
    PendingPrincipal,
    /// Approved by the principal
    PrincipalApproved,
    /// Rejected by the principal, returned for rework
    PrincipalRejected,
    /// Handed to the exam committee for scheduling
    SentToCommittee,
    /// Open for student attempts (subject to the exam's active flag)
    Active,
    /// Temporarily closed to attempts
    Locked,
    /// Permanently retired; the exam is immutable from here on
    Archived,
}

impl WorkflowState {
    /// Check if this is the terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived)
    }

    /// Exam content may only be edited while authoring or after a rejection.
    pub fn is_editable(&self) -> bool {
        matches!(
            self,
            Self::Draft | Self::Submitted | Self::HodRejected | Self::PrincipalRejected
        )
    }

    /// States from which an exam may be moved to `Active`.
    pub fn is_activatable(&self) -> bool {
        matches!(
            self,
            Self::HodApproved | Self::PrincipalApproved | Self::SentToCommittee
        )
    }

    /// Paper downloads are permitted in every state.
    pub fn is_downloadable(&self) -> bool {
        true
    }

    /// Students may start an attempt only while the exam is active in the
    /// workflow AND its active flag is set.
    pub fn can_start_attempt(&self, is_active_flag: bool) -> bool {
        matches!(self, Self::Active) && is_active_flag
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Submitted => write!(f, "submitted"),
            Self::PendingHod => write!(f, "pending_hod"),
            Self::HodApproved => write!(f, "hod_approved"),
            Self::HodRejected => write!(f, "hod_rejected"),
            Self::PendingPrincipal => write!(f, "pending_principal"),
            Self::PrincipalApproved => write!(f, "principal_approved"),
            Self::PrincipalRejected => write!(f, "principal_rejected"),
            Self::SentToCommittee => write!(f, "sent_to_committee"),
            Self::Active => write!(f, "active"),
            Self::Locked => write!(f, "locked"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for WorkflowState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "pending_hod" => Ok(Self::PendingHod),
            "hod_approved" => Ok(Self::HodApproved),
            "hod_rejected" => Ok(Self::HodRejected),
            "pending_principal" => Ok(Self::PendingPrincipal),
            "principal_approved" => Ok(Self::PrincipalApproved),
            "principal_rejected" => Ok(Self::PrincipalRejected),
            "sent_to_committee" => Ok(Self::SentToCommittee),
            "active" => Ok(Self::Active),
            "locked" => Ok(Self::Locked),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Invalid workflow state: {s}")),
        }
    }
}

/// Newly authored exams start in draft; a missing state is read as draft.
impl Default for WorkflowState {
    fn default() -> Self {
        Self::Draft
    }
}

/// All workflow states, in pipeline order. Used by the transition table and
/// by exhaustive property tests.
pub const ALL_STATES: [WorkflowState; 12] = [
    WorkflowState::Draft,
    WorkflowState::Submitted,
    WorkflowState::PendingHod,
    WorkflowState::HodApproved,
    WorkflowState::HodRejected,
    WorkflowState::PendingPrincipal,
    WorkflowState::PrincipalApproved,
    WorkflowState::PrincipalRejected,
    WorkflowState::SentToCommittee,
    WorkflowState::Active,
    WorkflowState::Locked,
    WorkflowState::Archived,
];

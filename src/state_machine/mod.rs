// Workflow governor for exam approval lifecycles.
//
// An explicit state-indexed transition table gates every move between
// workflow states against the caller's role, with an append-only audit trail
// behind every accepted transition.

pub mod governor;
pub mod roles;
pub mod states;
pub mod transitions;

// Re-export main types for convenient access
pub use governor::WorkflowGovernor;
pub use roles::{Actor, ActorRole};
pub use states::WorkflowState;
pub use transitions::{
    allowed_destinations, can_transition, permitted_roles, TransitionCheck, TransitionRule,
    TRANSITION_TABLE,
};

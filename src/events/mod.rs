//! Event system foundation: lifecycle notifications for the platform's
//! notification sink.

pub mod publisher;

pub use publisher::{EventPublisher, PublishError, PublishedEvent};

/// Event names emitted by the core.
pub mod names {
    /// An attempt was submitted and auto-scored.
    pub const EXAM_SUBMITTED: &str = "exam.submitted";
    /// Manual marking finalized; the result is visible to the student.
    pub const RESULT_PUBLISHED: &str = "exam.result_published";
    /// An exam moved along the approval workflow.
    pub const WORKFLOW_TRANSITIONED: &str = "exam.workflow_transitioned";
}

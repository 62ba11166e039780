//! Attempt lifecycle: start/resume/save/submit with auto-scoring, plus the
//! manual marking coordinator for subjective questions.

pub mod engine;
pub mod marking;

pub use engine::{AttemptEngine, HydratedQuestion, SaveStatePayload, StartOutcome, SubmitOutcome};
pub use marking::{FinalizeOutcome, MarkingCoordinator};

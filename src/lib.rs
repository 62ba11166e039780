#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Exam Core
//!
//! Core exam lifecycle engine for a multi-tenant assessment platform.
//!
//! ## Overview
//!
//! This crate owns the four pieces of an examination platform that carry the
//! real correctness risk, leaving HTTP routing, authentication, file storage
//! and document rendering to the surrounding system:
//!
//! - **Workflow governor** — a role-gated finite-state machine over the exam
//!   approval pipeline, with an append-only audit trail and a
//!   compare-and-swap write path that keeps concurrent conflicting
//!   transitions honest.
//! - **Question selector** — blueprint-driven drawing from the tenant's
//!   verified pool with global de-duplication and at most one question per
//!   shared reading passage.
//! - **Attempt engine** — start/resume/save/submit of a student's timed
//!   session with objective auto-scoring, plus the manual marking
//!   coordinator for subjective questions.
//! - **Deterministic shuffle** — a frozen string-hash + LCG scheme producing
//!   reproducible paper variants whose answer keys align order-for-order.
//!
//! ## Module Organization
//!
//! - [`models`] - Domain records: exams, blueprints, questions, attempts
//! - [`state_machine`] - Workflow states, roles, transition table, governor
//! - [`selection`] - Blueprint-driven question selection
//! - [`attempt`] - Attempt lifecycle and manual marking
//! - [`shuffle`] - Deterministic shuffling and paper-set generation
//! - [`storage`] - Persistence boundary traits and the in-memory store
//! - [`events`] - Fire-and-forget lifecycle notifications
//! - [`config`] - Environment-driven runtime configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use examcore::config::CoreConfig;
//! use examcore::events::EventPublisher;
//! use examcore::state_machine::{Actor, ActorRole, WorkflowGovernor, WorkflowState};
//! use examcore::storage::{ExamStorage, InMemoryStorage};
//!
//! # async fn example() -> examcore::Result<()> {
//! let config = CoreConfig::from_env()?;
//! let storage: Arc<dyn ExamStorage> = Arc::new(InMemoryStorage::new());
//! let events = EventPublisher::new(config.event_channel_capacity);
//!
//! let governor = WorkflowGovernor::new(Arc::clone(&storage), events.clone());
//! let check = governor.can_transition_to(
//!     Some(WorkflowState::Draft),
//!     WorkflowState::Submitted,
//!     ActorRole::Teacher,
//! );
//! assert!(check.is_valid());
//! # Ok(())
//! # }
//! ```

pub mod attempt;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod selection;
pub mod shuffle;
pub mod state_machine;
pub mod storage;

pub use attempt::{AttemptEngine, MarkingCoordinator};
pub use config::CoreConfig;
pub use error::{ExamCoreError, Result, StateError};
pub use selection::QuestionSelector;
pub use shuffle::PaperSetService;
pub use state_machine::{Actor, ActorRole, WorkflowGovernor, WorkflowState};
pub use storage::{ExamStorage, InMemoryStorage};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a student's attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    Submitted,
    Marked,
    Absent,
}

impl AttemptStatus {
    /// Completed attempts block any further attempt for the same
    /// (exam, student) pair and gate result visibility.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Submitted | Self::Marked)
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Submitted => write!(f, "submitted"),
            Self::Marked => write!(f, "marked"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

impl std::str::FromStr for AttemptStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(Self::InProgress),
            "submitted" => Ok(Self::Submitted),
            "marked" => Ok(Self::Marked),
            "absent" => Ok(Self::Absent),
            _ => Err(format!("Invalid attempt status: {s}")),
        }
    }
}

/// Client-reported navigation state of one question within an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionState {
    NotVisited,
    Visited,
    Answered,
}

impl Default for QuestionState {
    fn default() -> Self {
        Self::NotVisited
    }
}

/// One student's session against one exam. Created on the first start call,
/// mutated by save/submit/mark/finalize, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    /// The exact paper assigned at start. Order is the presentation order.
    pub question_ids: Vec<Uuid>,
    pub answers: HashMap<Uuid, String>,
    pub question_states: HashMap<Uuid, QuestionState>,
    pub marked_for_review: HashSet<Uuid>,
    /// Client-driven countdown checkpoint, in seconds.
    pub time_remaining_seconds: i64,
    /// Score from objective grading at submit time.
    pub auto_score: f64,
    /// Human-assigned scores for subjective questions, keyed by question id.
    pub manual_scores: HashMap<Uuid, f64>,
    /// Aggregate score; equals `auto_score` until manual marking finalizes.
    pub score: f64,
    /// Percentage against the exam's total marks, rounded to two decimals.
    pub percentage: f64,
    pub needs_manual_marking: bool,
    pub status: AttemptStatus,
    pub remarks: Option<String>,
    pub started_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub marked_at: Option<DateTime<Utc>>,
}

impl Attempt {
    /// Fresh in-progress attempt: every question not visited, empty answers
    /// and review set, countdown seeded from the exam duration.
    pub fn start(
        tenant_id: Uuid,
        exam_id: Uuid,
        student_id: Uuid,
        question_ids: Vec<Uuid>,
        duration_seconds: i64,
    ) -> Self {
        let question_states = question_ids
            .iter()
            .map(|id| (*id, QuestionState::NotVisited))
            .collect();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            exam_id,
            student_id,
            question_ids,
            answers: HashMap::new(),
            question_states,
            marked_for_review: HashSet::new(),
            time_remaining_seconds: duration_seconds,
            auto_score: 0.0,
            manual_scores: HashMap::new(),
            score: 0.0,
            percentage: 0.0,
            needs_manual_marking: false,
            status: AttemptStatus::InProgress,
            remarks: None,
            started_at: Utc::now(),
            submitted_at: None,
            marked_at: None,
        }
    }

    pub fn is_assigned(&self, question_id: Uuid) -> bool {
        self.question_ids.contains(&question_id)
    }
}

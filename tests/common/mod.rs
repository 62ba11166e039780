//! Shared fixture builders for the integration suites.

#![allow(dead_code)]

use std::sync::Arc;
use uuid::Uuid;

use examcore::config::CoreConfig;
use examcore::events::EventPublisher;
use examcore::models::{Difficulty, Exam, Passage, Question, QuestionType};
use examcore::state_machine::WorkflowState;
use examcore::storage::{ExamStorage, InMemoryStorage};

pub struct Fixture {
    pub storage: Arc<InMemoryStorage>,
    pub tenant_id: Uuid,
    pub events: EventPublisher,
    pub config: CoreConfig,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(InMemoryStorage::new()),
            tenant_id: Uuid::new_v4(),
            events: EventPublisher::default(),
            config: CoreConfig::default(),
        }
    }

    pub fn storage_dyn(&self) -> Arc<dyn ExamStorage> {
        self.storage.clone()
    }

    /// An exam open for attempts: workflow state active, active flag set.
    pub async fn active_exam(&self, total_marks: f64, duration_minutes: i64) -> Exam {
        let mut exam = Exam::new(
            self.tenant_id,
            "Integration Exam",
            "Maths",
            "8",
            total_marks,
            duration_minutes,
            Uuid::new_v4(),
        );
        exam.workflow_state = WorkflowState::Active;
        exam.is_active = true;
        self.storage.insert_exam(exam).await.unwrap()
    }

    pub async fn draft_exam(&self) -> Exam {
        let exam = Exam::new(
            self.tenant_id,
            "Draft Exam",
            "Maths",
            "8",
            20.0,
            60,
            Uuid::new_v4(),
        );
        self.storage.insert_exam(exam).await.unwrap()
    }

    pub fn question(&self, question_type: QuestionType, answer: Option<&str>, marks: f64) -> Question {
        Question {
            id: Uuid::new_v4(),
            tenant_id: self.tenant_id,
            subject: "Maths".to_string(),
            grade: "8".to_string(),
            content: "What is the value?".to_string(),
            question_type,
            marks,
            difficulty: Some(Difficulty::Medium),
            chapter: None,
            correct_answer: answer.map(str::to_string),
            passage_id: None,
            verified: true,
            for_assessment: true,
        }
    }

    pub async fn insert_mcq(&self, answer: &str, marks: f64) -> Question {
        let question = self.question(QuestionType::Mcq, Some(answer), marks);
        self.storage.insert_question(question).await.unwrap()
    }

    pub async fn insert_subjective(&self, marks: f64) -> Question {
        let question = self.question(QuestionType::ShortAnswer, None, marks);
        self.storage.insert_question(question).await.unwrap()
    }

    pub async fn insert_passage_with_questions(&self, question_count: usize) -> (Passage, Vec<Question>) {
        let passage = Passage {
            id: Uuid::new_v4(),
            tenant_id: self.tenant_id,
            title: Some("Reading".to_string()),
            body: "A shared reading passage.".to_string(),
        };
        let passage = self.storage.insert_passage(passage).await.unwrap();

        let mut questions = Vec::new();
        for _ in 0..question_count {
            let mut question = self.question(QuestionType::Mcq, Some("a"), 1.0);
            question.passage_id = Some(passage.id);
            questions.push(self.storage.insert_question(question).await.unwrap());
        }
        (passage, questions)
    }

    /// Attach questions to an exam as its pre-assigned paper.
    pub async fn assign_questions(&self, exam: &Exam, questions: &[Question]) -> Exam {
        let mut exam = exam.clone();
        exam.assigned_question_ids = questions.iter().map(|q| q.id).collect();
        self.storage.update_exam(exam).await.unwrap()
    }
}

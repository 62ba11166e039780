use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::TtlCache;
use crate::error::{ExamCoreError, Result};
use crate::models::{Passage, Question};
use crate::storage::ExamStorage;

use super::deterministic::{seed_for, shuffle};

/// One physically distinct, answer-key-aligned variant of an exam paper.
#[derive(Debug, Clone)]
pub struct PaperSet {
    pub exam_id: Uuid,
    pub set_number: u32,
    /// Presentation order for this variant.
    pub questions: Vec<Question>,
    /// Key entries aligned order-for-order with `questions`.
    pub answer_key: Vec<AnswerKeyEntry>,
    /// Passage texts referenced by this paper, for renderer layout.
    pub passages: Vec<Passage>,
}

#[derive(Debug, Clone)]
pub struct AnswerKeyEntry {
    pub position: usize,
    pub question_id: Uuid,
    pub correct_answer: Option<String>,
    pub marks: f64,
}

/// Generates printable paper variants for a (exam, set-number) pair.
///
/// Paper and answer key come out of separate render calls, so everything
/// here is a pure function of the stored question list and the deterministic
/// seed. Generated sets are kept in an explicit TTL cache so a paper and its
/// key rendered back-to-back reuse one computation.
pub struct PaperSetService {
    storage: Arc<dyn ExamStorage>,
    cache: TtlCache<(Uuid, u32), PaperSet>,
}

impl PaperSetService {
    pub fn new(storage: Arc<dyn ExamStorage>, cache_ttl: Duration) -> Self {
        Self {
            storage,
            cache: TtlCache::new(cache_ttl),
        }
    }

    pub async fn generate(
        &self,
        tenant_id: Uuid,
        exam_id: Uuid,
        set_number: u32,
    ) -> Result<PaperSet> {
        if let Some(cached) = self.cache.get(&(exam_id, set_number)) {
            return Ok(cached);
        }

        let exam = self.storage.get_exam(tenant_id, exam_id).await?;
        if exam.assigned_question_ids.is_empty() {
            return Err(ExamCoreError::Validation(format!(
                "exam {exam_id} has no assigned questions to lay out"
            )));
        }

        let questions = self
            .storage
            .get_questions(tenant_id, &exam.assigned_question_ids)
            .await?;

        let seed = seed_for(exam_id, set_number);
        let ordered = shuffle(&questions, seed);

        let answer_key = ordered
            .iter()
            .enumerate()
            .map(|(position, q)| AnswerKeyEntry {
                position: position + 1,
                question_id: q.id,
                correct_answer: q.correct_answer.clone(),
                marks: q.marks,
            })
            .collect();

        let passages = self.load_passages(tenant_id, &ordered).await?;

        let paper = PaperSet {
            exam_id,
            set_number,
            questions: ordered,
            answer_key,
            passages,
        };
        self.cache.insert((exam_id, set_number), paper.clone());

        tracing::debug!(
            exam_id = %exam_id,
            set_number = set_number,
            seed = seed,
            "generated paper set"
        );
        Ok(paper)
    }

    async fn load_passages(&self, tenant_id: Uuid, ordered: &[Question]) -> Result<Vec<Passage>> {
        // First-appearance order, one fetch per distinct passage.
        let mut seen: HashMap<Uuid, ()> = HashMap::new();
        let mut ids: Vec<Uuid> = Vec::new();
        for question in ordered {
            if let Some(passage_id) = question.passage_id {
                if seen.insert(passage_id, ()).is_none() {
                    ids.push(passage_id);
                }
            }
        }
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.storage.get_passages(tenant_id, &ids).await
    }
}

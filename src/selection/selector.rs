use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{BlueprintSection, Question};
use crate::shuffle::{fisher_yates, Lcg};
use crate::storage::{ExamStorage, QuestionPoolFilter};

/// Result of evaluating a blueprint: the concatenated ordered selection plus
/// the marks it carries. Sections that under-fill simply contribute fewer
/// questions; callers reconcile `total_marks` against the exam definition.
#[derive(Debug, Clone)]
pub struct SelectionOutcome {
    pub questions: Vec<Question>,
    pub total_marks: f64,
}

/// Blueprint-driven question selection over the tenant's verified pool.
pub struct QuestionSelector {
    storage: Arc<dyn ExamStorage>,
}

impl QuestionSelector {
    pub fn new(storage: Arc<dyn ExamStorage>) -> Self {
        Self { storage }
    }

    /// Evaluate `sections` in declared order against the tenant's pool.
    ///
    /// Per section: filter by subject/grade/type/marks and the optional
    /// chapter/difficulty narrowing, drop questions already selected earlier
    /// in this pass, collapse passage groups to one random representative,
    /// shuffle, and take the requested count. A pool smaller than requested
    /// under-fills rather than failing the whole evaluation.
    pub async fn select_for_blueprint(
        &self,
        tenant_id: Uuid,
        subject: &str,
        grade: &str,
        sections: &[BlueprintSection],
    ) -> Result<SelectionOutcome> {
        let mut rng = Lcg::from_entropy();
        let mut selected: Vec<Question> = Vec::new();
        let mut taken_ids: HashSet<Uuid> = HashSet::new();

        for section in sections {
            section.validate()?;

            let mut filter = QuestionPoolFilter::new(subject, grade);
            filter.question_type = Some(section.question_type);
            filter.marks = Some(section.marks);
            filter.difficulty = section.difficulty;
            filter.chapters = section.chapters.clone();

            let pool = self.storage.query_question_pool(tenant_id, &filter).await?;
            let fresh: Vec<Question> = pool
                .into_iter()
                .filter(|q| !taken_ids.contains(&q.id))
                .collect();

            let mut candidates = collapse_passage_groups(fresh, &mut rng);
            fisher_yates(&mut candidates, &mut rng);

            if candidates.len() < section.question_count {
                tracing::debug!(
                    section = %section.name,
                    requested = section.question_count,
                    available = candidates.len(),
                    "section pool under-fills; returning all available questions"
                );
            }
            candidates.truncate(section.question_count);

            taken_ids.extend(candidates.iter().map(|q| q.id));
            selected.extend(candidates);
        }

        let total_marks = selected.iter().map(|q| q.marks).sum();
        Ok(SelectionOutcome {
            questions: selected,
            total_marks,
        })
    }

    /// Draw `count` auto-gradable questions for an online attempt, applying
    /// the same passage-grouping rule as a blueprint pass.
    pub async fn draw_objective_pool(
        &self,
        tenant_id: Uuid,
        subject: &str,
        grade: &str,
        count: usize,
    ) -> Result<Vec<Question>> {
        let mut filter = QuestionPoolFilter::new(subject, grade);
        filter.objective_only = true;

        let pool = self.storage.query_question_pool(tenant_id, &filter).await?;

        let mut rng = Lcg::from_entropy();
        let mut candidates = collapse_passage_groups(pool, &mut rng);
        fisher_yates(&mut candidates, &mut rng);
        candidates.truncate(count);
        Ok(candidates)
    }
}

/// Collapse passage groups to one uniformly random representative each and
/// merge the representatives with the standalone questions.
///
/// Guarantees at most one question per distinct passage id in the output of
/// a single selection pass.
pub fn collapse_passage_groups(candidates: Vec<Question>, rng: &mut Lcg) -> Vec<Question> {
    let mut standalone: Vec<Question> = Vec::new();
    let mut groups: HashMap<Uuid, Vec<Question>> = HashMap::new();

    for question in candidates {
        match question.passage_id {
            Some(passage_id) => groups.entry(passage_id).or_default().push(question),
            None => standalone.push(question),
        }
    }

    // HashMap order is nondeterministic; iterate a sorted key list so the
    // representative draw is the only randomness.
    let mut passage_ids: Vec<Uuid> = groups.keys().copied().collect();
    passage_ids.sort();

    let mut merged = standalone;
    for passage_id in passage_ids {
        let mut group = groups.remove(&passage_id).unwrap_or_default();
        if group.is_empty() {
            continue;
        }
        let pick = rng.pick(group.len());
        merged.push(group.swap_remove(pick));
    }
    merged
}

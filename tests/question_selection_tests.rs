//! Blueprint-driven selection integration: section ordering, pool
//! narrowing, passage de-duplication, and under-fill behavior.

mod common;

use std::collections::HashSet;
use uuid::Uuid;

use common::Fixture;
use examcore::error::ExamCoreError;
use examcore::ExamStorage;
use examcore::models::{Blueprint, BlueprintSection, Difficulty, QuestionType};
use examcore::selection::QuestionSelector;

fn section(name: &str, question_type: QuestionType, marks: f64, count: usize) -> BlueprintSection {
    BlueprintSection {
        name: name.to_string(),
        marks,
        question_count: count,
        question_type,
        difficulty: None,
        chapters: None,
    }
}

#[tokio::test]
async fn sections_fill_in_declared_order() {
    let fixture = Fixture::new();
    for _ in 0..5 {
        fixture.insert_mcq("a", 1.0).await;
    }
    for _ in 0..4 {
        let question = fixture.question(QuestionType::ShortAnswer, None, 3.0);
        fixture.storage.insert_question(question).await.unwrap();
    }

    let selector = QuestionSelector::new(fixture.storage_dyn());
    let outcome = selector
        .select_for_blueprint(
            fixture.tenant_id,
            "Maths",
            "8",
            &[
                section("Objective", QuestionType::Mcq, 1.0, 3),
                section("Short answers", QuestionType::ShortAnswer, 3.0, 2),
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcome.questions.len(), 5);
    // The first section's questions come first, then the second's.
    assert!(outcome.questions[..3]
        .iter()
        .all(|q| q.question_type == QuestionType::Mcq));
    assert!(outcome.questions[3..]
        .iter()
        .all(|q| q.question_type == QuestionType::ShortAnswer));
    assert!((outcome.total_marks - 9.0).abs() < 1e-9);
}

#[tokio::test]
async fn chapter_and_difficulty_narrowing_is_applied() {
    let fixture = Fixture::new();
    let mut algebra = fixture.question(QuestionType::Mcq, Some("a"), 1.0);
    algebra.chapter = Some("Algebra".to_string());
    algebra.difficulty = Some(Difficulty::Hard);
    let algebra = fixture.storage.insert_question(algebra).await.unwrap();

    let mut geometry = fixture.question(QuestionType::Mcq, Some("b"), 1.0);
    geometry.chapter = Some("Geometry".to_string());
    geometry.difficulty = Some(Difficulty::Hard);
    fixture.storage.insert_question(geometry).await.unwrap();

    let mut easy_algebra = fixture.question(QuestionType::Mcq, Some("c"), 1.0);
    easy_algebra.chapter = Some("Algebra".to_string());
    easy_algebra.difficulty = Some(Difficulty::Easy);
    fixture.storage.insert_question(easy_algebra).await.unwrap();

    let mut narrowed = section("Hard algebra", QuestionType::Mcq, 1.0, 5);
    narrowed.difficulty = Some(Difficulty::Hard);
    narrowed.chapters = Some(vec!["Algebra".to_string()]);

    let selector = QuestionSelector::new(fixture.storage_dyn());
    let outcome = selector
        .select_for_blueprint(fixture.tenant_id, "Maths", "8", &[narrowed])
        .await
        .unwrap();

    assert_eq!(outcome.questions.len(), 1);
    assert_eq!(outcome.questions[0].id, algebra.id);
}

#[tokio::test]
async fn a_passage_contributes_at_most_one_question() {
    let fixture = Fixture::new();
    let (_, grouped) = fixture.insert_passage_with_questions(4).await;
    fixture.insert_mcq("a", 1.0).await;
    fixture.insert_mcq("b", 1.0).await;

    let selector = QuestionSelector::new(fixture.storage_dyn());
    let outcome = selector
        .select_for_blueprint(
            fixture.tenant_id,
            "Maths",
            "8",
            &[section("Objective", QuestionType::Mcq, 1.0, 6)],
        )
        .await
        .unwrap();

    // Four passage siblings collapse to one representative; two standalone
    // questions remain, so the section under-fills to three.
    assert_eq!(outcome.questions.len(), 3);
    let passage_hits = outcome
        .questions
        .iter()
        .filter(|q| grouped.iter().any(|g| g.id == q.id))
        .count();
    assert_eq!(passage_hits, 1);
}

#[tokio::test]
async fn repeated_draws_cover_the_pool() {
    let fixture = Fixture::new();
    let mut pool_ids = HashSet::new();
    for _ in 0..8 {
        pool_ids.insert(fixture.insert_mcq("a", 1.0).await.id);
    }

    let selector = QuestionSelector::new(fixture.storage_dyn());
    let mut seen = HashSet::new();
    for _ in 0..40 {
        let drawn = selector
            .draw_objective_pool(fixture.tenant_id, "Maths", "8", 2)
            .await
            .unwrap();
        assert_eq!(drawn.len(), 2);
        for question in drawn {
            assert!(pool_ids.contains(&question.id));
            seen.insert(question.id);
        }
    }
    // Forty draws of two from eight should touch more than a single pair.
    assert!(seen.len() > 2, "draws never varied");
}

#[tokio::test]
async fn invalid_sections_are_rejected_before_any_draw() {
    let fixture = Fixture::new();
    fixture.insert_mcq("a", 1.0).await;

    let selector = QuestionSelector::new(fixture.storage_dyn());
    let zero_count = section("Empty", QuestionType::Mcq, 1.0, 0);
    let err = selector
        .select_for_blueprint(fixture.tenant_id, "Maths", "8", &[zero_count])
        .await
        .unwrap_err();
    assert!(matches!(err, ExamCoreError::Validation(_)));
}

#[tokio::test]
async fn blueprint_validation_and_planned_marks() {
    let fixture = Fixture::new();
    let blueprint = Blueprint {
        id: Uuid::new_v4(),
        tenant_id: fixture.tenant_id,
        name: "Term 1".to_string(),
        sections: vec![
            section("Objective", QuestionType::Mcq, 1.0, 10),
            section("Short answers", QuestionType::ShortAnswer, 3.0, 5),
        ],
    };
    blueprint.validate().unwrap();
    assert!((blueprint.planned_marks() - 25.0).abs() < 1e-9);

    let stored = fixture.storage.insert_blueprint(blueprint).await.unwrap();
    let fetched = fixture
        .storage
        .get_blueprint(fixture.tenant_id, stored.id)
        .await
        .unwrap();
    assert_eq!(fetched.sections.len(), 2);
}

#[tokio::test]
async fn pools_never_cross_tenants() {
    let fixture = Fixture::new();
    fixture.insert_mcq("a", 1.0).await;

    let mut foreign = fixture.question(QuestionType::Mcq, Some("a"), 1.0);
    foreign.tenant_id = Uuid::new_v4();
    fixture.storage.insert_question(foreign).await.unwrap();

    let selector = QuestionSelector::new(fixture.storage_dyn());
    let drawn = selector
        .draw_objective_pool(fixture.tenant_id, "Maths", "8", 10)
        .await
        .unwrap();
    assert_eq!(drawn.len(), 1);
}

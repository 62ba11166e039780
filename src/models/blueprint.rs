use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ExamCoreError, Result};
use crate::models::question::{Difficulty, QuestionType};

/// One section of a blueprint: how many questions of which shape to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintSection {
    pub name: String,
    /// Marks carried by each question drawn for this section.
    pub marks: f64,
    pub question_count: usize,
    pub question_type: QuestionType,
    pub difficulty: Option<Difficulty>,
    /// When present, restricts the pool to these chapters.
    pub chapters: Option<Vec<String>>,
}

impl BlueprintSection {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ExamCoreError::Validation(
                "blueprint section name must not be empty".to_string(),
            ));
        }
        if self.question_count == 0 {
            return Err(ExamCoreError::Validation(format!(
                "blueprint section '{}' requests zero questions",
                self.name
            )));
        }
        if self.marks <= 0.0 {
            return Err(ExamCoreError::Validation(format!(
                "blueprint section '{}' has non-positive marks",
                self.name
            )));
        }
        if let Some(chapters) = &self.chapters {
            if chapters.is_empty() {
                return Err(ExamCoreError::Validation(format!(
                    "blueprint section '{}' has an empty chapter list",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// A declarative drawing plan for an exam paper. Read-only input to the
/// question selector; sections are evaluated in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub sections: Vec<BlueprintSection>,
}

impl Blueprint {
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(ExamCoreError::Validation(
                "blueprint must declare at least one section".to_string(),
            ));
        }
        for section in &self.sections {
            section.validate()?;
        }
        Ok(())
    }

    /// Total marks the blueprint plans for, summed across sections.
    pub fn planned_marks(&self) -> f64 {
        self.sections
            .iter()
            .map(|s| s.marks * s.question_count as f64)
            .sum()
    }
}

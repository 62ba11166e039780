use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Question formats. Objective types are auto-gradable; subjective types go
/// through the manual marking coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Mcq,
    TrueFalse,
    FillBlank,
    Numerical,
    AssertionReason,
    Matching,
    ShortAnswer,
    LongAnswer,
}

impl QuestionType {
    pub fn is_objective(&self) -> bool {
        !self.is_subjective()
    }

    pub fn is_subjective(&self) -> bool {
        matches!(self, Self::ShortAnswer | Self::LongAnswer)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mcq => write!(f, "mcq"),
            Self::TrueFalse => write!(f, "true_false"),
            Self::FillBlank => write!(f, "fill_blank"),
            Self::Numerical => write!(f, "numerical"),
            Self::AssertionReason => write!(f, "assertion_reason"),
            Self::Matching => write!(f, "matching"),
            Self::ShortAnswer => write!(f, "short_answer"),
            Self::LongAnswer => write!(f, "long_answer"),
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcq" => Ok(Self::Mcq),
            "true_false" => Ok(Self::TrueFalse),
            "fill_blank" => Ok(Self::FillBlank),
            "numerical" => Ok(Self::Numerical),
            "assertion_reason" => Ok(Self::AssertionReason),
            "matching" => Ok(Self::Matching),
            "short_answer" => Ok(Self::ShortAnswer),
            "long_answer" => Ok(Self::LongAnswer),
            _ => Err(format!("Invalid question type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

/// A tenant-scoped question in the pool. Immutable while referenced by an
/// in-progress attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub subject: String,
    pub grade: String,
    pub content: String,
    pub question_type: QuestionType,
    /// Marks awarded for a fully correct answer.
    pub marks: f64,
    pub difficulty: Option<Difficulty>,
    pub chapter: Option<String>,
    /// Stored answer key for objective grading; subjective questions have none.
    pub correct_answer: Option<String>,
    /// Present when the question belongs to a shared reading passage.
    pub passage_id: Option<Uuid>,
    /// Only verified questions enter selection pools.
    pub verified: bool,
    /// Authoring flag marking the question usable in assessments.
    pub for_assessment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_subjective_split() {
        assert!(QuestionType::Mcq.is_objective());
        assert!(QuestionType::TrueFalse.is_objective());
        assert!(QuestionType::FillBlank.is_objective());
        assert!(QuestionType::Numerical.is_objective());
        assert!(QuestionType::AssertionReason.is_objective());
        assert!(QuestionType::Matching.is_objective());
        assert!(QuestionType::ShortAnswer.is_subjective());
        assert!(QuestionType::LongAnswer.is_subjective());
    }

    #[test]
    fn test_question_type_serde() {
        let json = serde_json::to_string(&QuestionType::AssertionReason).unwrap();
        assert_eq!(json, "\"assertion_reason\"");
        assert_eq!("matching".parse::<QuestionType>().unwrap(), QuestionType::Matching);
    }
}

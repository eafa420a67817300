//! The scoring core: pure functions from an answer set to a composite
//! assessment result. No I/O, no state, safe to call from any number of
//! concurrent callers; the same answers always produce the same result.

mod answers;
mod catalogue;
mod classification;
mod scoring;

pub use answers::{Answer, AnswerSet};
pub use catalogue::{Catalogue, Question, QuestionOption, POINTS_PER_QUESTION};
pub use classification::{
    lead_score_for, pain_level_for, urgency_for, PainLevel, UrgencyLevel,
    PROBLEM_POINT_CEILING, URGENCY_INDICATOR_QUESTIONS,
};
pub use scoring::{category_for, compute_score, ScoreCategory};

use serde::{Deserialize, Serialize};

/// Composite output of one assessment run, immutable once computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub score_percent: u8,
    pub category: ScoreCategory,
    pub urgency: UrgencyLevel,
    pub lead_score: u8,
    pub pain_level: PainLevel,
}

/// Stateless evaluator binding the fixed catalogue to the scoring pipeline.
#[derive(Debug, Clone, Copy)]
pub struct AssessmentEngine {
    catalogue: &'static Catalogue,
}

impl AssessmentEngine {
    pub fn new() -> Self {
        Self {
            catalogue: Catalogue::shared(),
        }
    }

    pub fn catalogue(&self) -> &'static Catalogue {
        self.catalogue
    }

    pub fn score_percent(&self, answers: &AnswerSet) -> u8 {
        compute_score(answers, self.catalogue)
    }

    /// The single entry point collaborators call. Tolerates partial answer
    /// sets without failing and always returns a fully populated result.
    pub fn assess(&self, answers: &AnswerSet, company_size: &str, sector: &str) -> AssessmentResult {
        let score_percent = self.score_percent(answers);

        AssessmentResult {
            score_percent,
            category: category_for(score_percent),
            urgency: urgency_for(answers),
            lead_score: lead_score_for(answers, company_size, sector),
            pain_level: pain_level_for(answers),
        }
    }
}

impl Default for AssessmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

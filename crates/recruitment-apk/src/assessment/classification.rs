use std::fmt;

use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;

/// Question ids whose low answers signal time-sensitive follow-up.
pub const URGENCY_INDICATOR_QUESTIONS: [u8; 7] = [2, 5, 13, 14, 17, 19, 23];

/// An answer at or below this point value counts as a problem signal.
pub const PROBLEM_POINT_CEILING: u8 = 3;

/// How time-sensitive sales follow-up should be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrgencyLevel {
    #[serde(rename = "ZEER HOOG")]
    ZeerHoog,
    #[serde(rename = "HOOG")]
    Hoog,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LAAG")]
    Laag,
}

impl UrgencyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyLevel::ZeerHoog => "ZEER HOOG",
            UrgencyLevel::Hoog => "HOOG",
            UrgencyLevel::Medium => "MEDIUM",
            UrgencyLevel::Laag => "LAAG",
        }
    }

    /// Follow-up advice surfaced in the notification mail and the CRM note.
    pub fn recommended_action(&self) -> &'static str {
        match self {
            UrgencyLevel::ZeerHoog => "URGENT: Direct contact opnemen!",
            UrgencyLevel::Hoog => "Contact opnemen binnen 24 uur",
            UrgencyLevel::Medium | UrgencyLevel::Laag => "Follow-up inplannen deze week",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How many problem answers the respondent gave, bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PainLevel {
    #[serde(rename = "KRITIEK")]
    Kritiek,
    #[serde(rename = "HOOG")]
    Hoog,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LAAG")]
    Laag,
}

impl PainLevel {
    pub fn label(&self) -> &'static str {
        match self {
            PainLevel::Kritiek => "KRITIEK",
            PainLevel::Hoog => "HOOG",
            PainLevel::Medium => "MEDIUM",
            PainLevel::Laag => "LAAG",
        }
    }
}

impl fmt::Display for PainLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Count low-scoring indicator answers and bucket the result. Unanswered
/// indicators contribute nothing: classification is best-effort over whatever
/// answers arrived, with no normalization for partial completion.
pub fn urgency_for(answers: &AnswerSet) -> UrgencyLevel {
    let hit_count = URGENCY_INDICATOR_QUESTIONS
        .iter()
        .filter(|id| {
            answers
                .points_for(**id)
                .is_some_and(|points| points <= PROBLEM_POINT_CEILING)
        })
        .count();

    if hit_count >= 4 {
        UrgencyLevel::ZeerHoog
    } else if hit_count >= 3 {
        UrgencyLevel::Hoog
    } else if hit_count >= 2 {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Laag
    }
}

/// Heuristic 0-100 estimate of how commercially promising the lead is.
/// Per-answer adjustments first, then the company-size and sector bonuses,
/// clamped exactly once at the end.
pub fn lead_score_for(answers: &AnswerSet, company_size: &str, sector: &str) -> u8 {
    let mut score: i32 = 50;

    for (_, points) in answers.iter() {
        if points <= 2 {
            score += 15;
        } else if points <= 4 {
            score += 10;
        } else if points >= 8 {
            score -= 5;
        }
    }

    // Largest bracket first; the brackets are mutually exclusive.
    if company_size.contains("200+") {
        score += 20;
    } else if company_size.contains("51-200") {
        score += 15;
    } else if company_size.contains("11-50") {
        score += 10;
    }

    if sector.contains("High-tech") || sector.contains("Machinebouw") {
        score += 15;
    }

    score.clamp(0, 100) as u8
}

/// Bucket the count of problem answers over the whole answered set.
pub fn pain_level_for(answers: &AnswerSet) -> PainLevel {
    let problem_count = answers
        .iter()
        .filter(|(_, points)| *points <= PROBLEM_POINT_CEILING)
        .count();

    if problem_count >= 10 {
        PainLevel::Kritiek
    } else if problem_count >= 7 {
        PainLevel::Hoog
    } else if problem_count >= 4 {
        PainLevel::Medium
    } else {
        PainLevel::Laag
    }
}

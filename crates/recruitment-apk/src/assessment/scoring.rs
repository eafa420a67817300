use std::fmt;

use serde::{Deserialize, Serialize};

use super::answers::AnswerSet;
use super::catalogue::Catalogue;

/// Verdict bucket shown to the visitor. Serialized with the Dutch labels the
/// frontend, email, and CSV backup all display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreCategory {
    Excellent,
    Goed,
    Gemiddeld,
    #[serde(rename = "Onder Gemiddeld")]
    OnderGemiddeld,
    #[serde(rename = "Verbetering Nodig")]
    VerbeteringNodig,
}

impl ScoreCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::Excellent => "Excellent",
            ScoreCategory::Goed => "Goed",
            ScoreCategory::Gemiddeld => "Gemiddeld",
            ScoreCategory::OnderGemiddeld => "Onder Gemiddeld",
            ScoreCategory::VerbeteringNodig => "Verbetering Nodig",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Percentage score over the full catalogue, rounded half-up. A partial
/// answer set simply scores proportionally low; an empty set scores 0.
pub fn compute_score(answers: &AnswerSet, catalogue: &Catalogue) -> u8 {
    let max = catalogue.max_score();
    if max == 0 {
        return 0;
    }

    let percent = (f64::from(answers.total_points()) * 100.0 / f64::from(max)).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Step function with closed thresholds, evaluated top-down, first match wins.
pub fn category_for(score_percent: u8) -> ScoreCategory {
    if score_percent >= 85 {
        ScoreCategory::Excellent
    } else if score_percent >= 70 {
        ScoreCategory::Goed
    } else if score_percent >= 55 {
        ScoreCategory::Gemiddeld
    } else if score_percent >= 40 {
        ScoreCategory::OnderGemiddeld
    } else {
        ScoreCategory::VerbeteringNodig
    }
}

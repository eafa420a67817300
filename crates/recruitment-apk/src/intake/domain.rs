use std::collections::BTreeMap;

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::assessment::{AnswerSet, AssessmentResult};

/// Number of `answer_NN` fields on the wire and `QNN` columns in the backup.
pub const ANSWER_FIELD_COUNT: u8 = 29;

/// Timestamp format used across the response, the CSV backup, and the CRM note.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw submission payload. Every field is optional at the serde layer so
/// validation can report the complete list of problems instead of failing on
/// the first missing key; `validate` decides what is actually required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub sector: Option<String>,
    pub company_size: Option<String>,
    pub assessment_score: Option<i64>,
    pub score_category: Option<String>,
    pub urgency_level: Option<String>,
    pub lead_score: Option<i64>,
    pub pain_level: Option<String>,
    /// Holds the `answer_01`..`answer_29` keys (and anything else the client
    /// sends); extracted by [`SubmissionRequest::answer_set`].
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SubmissionRequest {
    /// Collect the `answer_NN` fields into an answer set. Only keys present in
    /// the payload are recorded, so partial assessments keep their best-effort
    /// classification semantics; a present but non-numeric value counts as 0.
    pub fn answer_set(&self) -> AnswerSet {
        let mut answers = AnswerSet::new();
        for id in 1..=ANSWER_FIELD_COUNT {
            let key = format!("answer_{id:02}");
            if let Some(value) = self.extra.get(&key) {
                let points = value.as_u64().map(|p| p.min(10) as u8).unwrap_or(0);
                answers.record(id, points);
            }
        }
        answers
    }

    pub fn sector_or_default(&self) -> &str {
        self.sector.as_deref().filter(|s| !s.is_empty()).unwrap_or("Unknown")
    }

    pub fn company_size_or_default(&self) -> &str {
        self.company_size
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Unknown")
    }
}

/// A finished submission bound to its server-computed result. Created once,
/// never mutated, forwarded to each sink independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRecord {
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub sector: String,
    pub company_size: String,
    pub result: AssessmentResult,
    pub answers: AnswerSet,
}

impl LeadRecord {
    pub(crate) fn now_timestamp() -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Points for one question, with the unanswered-means-zero convention the
    /// CSV backup uses.
    pub fn answer_points(&self, question_id: u8) -> u8 {
        self.answers.points_for(question_id).unwrap_or(0)
    }
}

/// Per-sink outcome flags echoed back to the caller. A sink failure flips its
/// flag but never fails the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub csv_saved: bool,
    pub email_sent: bool,
    pub pipedrive_synced: bool,
    pub pipedrive_deal_id: Option<u64>,
}

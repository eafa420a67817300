use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single recorded selection. The point value is copied from the chosen
/// option at selection time and never re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: u8,
    pub points: u8,
}

/// Answers keyed by question id. Building one from a sequence de-duplicates
/// with last-write-wins, so a visitor revising an earlier question keeps only
/// the latest selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<u8, u8>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection; an existing answer for the same question is replaced.
    pub fn record(&mut self, question_id: u8, points: u8) {
        self.answers.insert(question_id, points);
    }

    pub fn points_for(&self, question_id: u8) -> Option<u8> {
        self.answers.get(&question_id).copied()
    }

    pub fn total_points(&self) -> u32 {
        self.answers.values().map(|points| u32::from(*points)).sum()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.answers.iter().map(|(id, points)| (*id, *points))
    }
}

impl FromIterator<Answer> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = Answer>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for answer in iter {
            set.record(answer.question_id, answer.points);
        }
        set
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The four competency dimensions of the Functional Freedom Score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "R")]
    Reflection,
    #[serde(rename = "C")]
    Correction,
    #[serde(rename = "H")]
    Management,
    #[serde(rename = "T")]
    Creativity,
}

impl Dimension {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Reflection,
            Self::Correction,
            Self::Management,
            Self::Creativity,
        ]
    }

    /// Single-letter code used by the input surface and the history layout.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Reflection => "R",
            Self::Correction => "C",
            Self::Management => "H",
            Self::Creativity => "T",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Reflection => "Reflection",
            Self::Correction => "Correction",
            Self::Management => "Management",
            Self::Creativity => "Creativity",
        }
    }
}

/// Completed raw answers for one assessment attempt, keyed by dimension.
///
/// This is the payload half of the submit event: one integer in [0,10] per
/// question, in question order. Never mutated after scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<Dimension, Vec<u8>>,
}

impl AnswerSet {
    pub fn new(answers: BTreeMap<Dimension, Vec<u8>>) -> Self {
        Self { answers }
    }

    pub fn raw_scores(&self, dimension: Dimension) -> Option<&[u8]> {
        self.answers.get(&dimension).map(Vec::as_slice)
    }
}

/// Per-dimension arithmetic means, each a real number in [0,10].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionScores {
    scores: BTreeMap<Dimension, f64>,
}

impl DimensionScores {
    pub fn new(scores: BTreeMap<Dimension, f64>) -> Self {
        Self { scores }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.scores.get(&dimension).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.scores.iter().map(|(dimension, score)| (*dimension, *score))
    }
}

/// One completed assessment as persisted: immutable once appended, totally
/// ordered by timestamp (appends are the only write path).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub timestamp: NaiveDateTime,
    pub context: String,
    pub scores: DimensionScores,
    pub composite: f64,
}

/// Signed difference between the current result and the immediately
/// preceding history record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreDelta {
    pub composite: f64,
    pub dimensions: BTreeMap<Dimension, f64>,
}

impl ScoreDelta {
    pub fn dimension(&self, dimension: Dimension) -> f64 {
        self.dimensions.get(&dimension).copied().unwrap_or(0.0)
    }
}

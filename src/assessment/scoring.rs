use super::catalog::{ContextProfile, QuestionBank};
use super::domain::{AnswerSet, Dimension, DimensionScores};
use std::collections::BTreeMap;

/// Raw scores may not exceed the scale ceiling; `u8` already rules out
/// negatives at the boundary.
const MAX_RAW_SCORE: u8 = 10;

/// Reasons an answer set is rejected before any score is produced.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("dimension {dimension} has {actual} answers, expected {expected}")]
    IncompleteAnswers {
        dimension: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("dimension {dimension} answer {value} is outside the 0-10 scale")]
    AnswerOutOfRange { dimension: &'static str, value: u8 },
}

/// Scores and composite for one assessment, prior to persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAssessment {
    pub context: &'static str,
    pub scores: DimensionScores,
    pub composite: f64,
}

/// Stateless scorer: per-dimension arithmetic means folded into the
/// context-weighted composite. Pure function of its inputs.
#[derive(Debug)]
pub struct ScoringEngine {
    bank: QuestionBank,
}

impl ScoringEngine {
    pub fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }

    pub fn score(
        &self,
        answers: &AnswerSet,
        profile: &ContextProfile,
    ) -> Result<ScoredAssessment, ScoringError> {
        let mut means = BTreeMap::new();

        for dimension in Dimension::ordered() {
            let raw = answers.raw_scores(dimension).unwrap_or(&[]);
            let expected = self.bank.question_count(dimension);
            if raw.len() != expected {
                return Err(ScoringError::IncompleteAnswers {
                    dimension: dimension.code(),
                    expected,
                    actual: raw.len(),
                });
            }
            if let Some(&value) = raw.iter().find(|&&value| value > MAX_RAW_SCORE) {
                return Err(ScoringError::AnswerOutOfRange {
                    dimension: dimension.code(),
                    value,
                });
            }

            let total: u32 = raw.iter().map(|&value| u32::from(value)).sum();
            means.insert(dimension, f64::from(total) / raw.len() as f64);
        }

        let scores = DimensionScores::new(means);
        let composite = composite_score(&scores, profile);

        Ok(ScoredAssessment {
            context: profile.name,
            scores,
            composite,
        })
    }
}

fn composite_score(scores: &DimensionScores, profile: &ContextProfile) -> f64 {
    scores
        .iter()
        .map(|(dimension, score)| profile.weight(dimension) * score)
        .sum()
}

use super::catalog::{ContextCatalog, GuidanceCatalog, QuestionBank, UnknownContext};
use super::delta;
use super::domain::{AnswerSet, Dimension, DimensionScores, HistoryRecord, ScoreDelta};
use super::history::HistoryStore;
use super::recommend::RecommendationSelector;
use super::scoring::{ScoringEngine, ScoringError};
use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// The atomic submit event from the input surface: a completed answer set
/// plus the selected context name.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSubmission {
    pub context: String,
    pub answers: AnswerSet,
}

/// Everything the presentation shell needs from one completed assessment,
/// as plain data.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOutcome {
    pub timestamp: NaiveDateTime,
    pub context: String,
    pub scores: DimensionScores,
    pub composite: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<ScoreDelta>,
    pub recommendations: BTreeMap<Dimension, Vec<&'static str>>,
    pub persisted: bool,
}

/// Aggregate view of the stored history for the progress surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub assessments: usize,
    pub latest_composite: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_delta: Option<f64>,
    pub mean_composite: f64,
}

/// Failures that block an assessment. Everything else in the pipeline
/// degrades instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    InvalidContext(#[from] UnknownContext),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// Service composing the catalogs, scoring engine, recommendation selector,
/// and history store into the assessment pipeline.
pub struct AssessmentService<H> {
    contexts: ContextCatalog,
    engine: ScoringEngine,
    selector: RecommendationSelector,
    history: H,
}

impl<H: HistoryStore> AssessmentService<H> {
    pub fn new(history: H, recommendation_threshold: f64) -> Self {
        Self {
            contexts: ContextCatalog::standard(),
            engine: ScoringEngine::new(QuestionBank::standard()),
            selector: RecommendationSelector::new(
                GuidanceCatalog::standard(),
                recommendation_threshold,
            ),
            history,
        }
    }

    /// Score a submission, compare it to the previous stored result, select
    /// recommendations, and append the record.
    ///
    /// Only context and answer validation can fail. An unreadable history
    /// degrades to "no previous result"; a failed append degrades to
    /// `persisted: false` so the scores still reach the user.
    pub fn submit(
        &mut self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentOutcome, AssessmentError> {
        let profile = self.contexts.lookup(&submission.context)?;
        let scored = self.engine.score(&submission.answers, profile)?;

        let prior = self.load_degraded();
        let delta = delta::against_previous(&scored, &prior);
        let recommendations = self.selector.recommend(&scored.scores);

        let timestamp = append_timestamp();
        let record = HistoryRecord {
            timestamp,
            context: scored.context.to_string(),
            scores: scored.scores.clone(),
            composite: scored.composite,
        };

        let persisted = match self.history.append(&record) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "history append failed; assessment not persisted");
                false
            }
        };

        info!(
            context = %record.context,
            composite = record.composite,
            persisted,
            "assessment scored"
        );

        Ok(AssessmentOutcome {
            timestamp,
            context: record.context,
            scores: scored.scores,
            composite: scored.composite,
            delta,
            recommendations,
            persisted,
        })
    }

    /// Chronological history, degrading an unreadable store to empty.
    pub fn history(&self) -> Vec<HistoryRecord> {
        self.load_degraded()
    }

    /// Rebuilds an outcome from the latest stored record, so the
    /// recommendations surface works without re-taking the assessment.
    pub fn latest_outcome(&self) -> Option<AssessmentOutcome> {
        let records = self.load_degraded();
        let (latest, prior) = records.split_last()?;

        let scored = super::scoring::ScoredAssessment {
            context: "",
            scores: latest.scores.clone(),
            composite: latest.composite,
        };
        let delta = delta::against_previous(&scored, prior);
        let recommendations = self.selector.recommend(&latest.scores);

        Some(AssessmentOutcome {
            timestamp: latest.timestamp,
            context: latest.context.clone(),
            scores: latest.scores.clone(),
            composite: latest.composite,
            delta,
            recommendations,
            persisted: true,
        })
    }

    fn load_degraded(&self) -> Vec<HistoryRecord> {
        match self.history.load_all() {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "history unavailable, continuing with empty history");
                Vec::new()
            }
        }
    }
}

/// Summary statistics over the stored records; `None` for empty history.
pub fn summarize(records: &[HistoryRecord]) -> Option<HistorySummary> {
    let (latest, prior) = records.split_last()?;
    let mean_composite =
        records.iter().map(|record| record.composite).sum::<f64>() / records.len() as f64;

    Some(HistorySummary {
        assessments: records.len(),
        latest_composite: latest.composite,
        latest_delta: prior.last().map(|previous| latest.composite - previous.composite),
        mean_composite,
    })
}

/// Append-time timestamp at second precision; sub-second digits never reach
/// the history stream, so they are dropped before the record is built.
fn append_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::history::InMemoryHistoryStore;
    use crate::assessment::recommend::DEFAULT_THRESHOLD;

    fn submission(context: &str, values: [u8; 4]) -> AssessmentSubmission {
        let mut map = BTreeMap::new();
        for (dimension, value) in Dimension::ordered().into_iter().zip(values) {
            map.insert(dimension, vec![value; 5]);
        }
        AssessmentSubmission {
            context: context.to_string(),
            answers: AnswerSet::new(map),
        }
    }

    #[test]
    fn unknown_context_blocks_the_assessment() {
        let mut service = AssessmentService::new(InMemoryHistoryStore::new(), DEFAULT_THRESHOLD);
        let err = service
            .submit(submission("wellness", [5, 5, 5, 5]))
            .expect_err("unknown profile");
        assert!(matches!(err, AssessmentError::InvalidContext(_)));
    }

    #[test]
    fn first_submission_scores_without_a_delta_and_persists() {
        let mut service = AssessmentService::new(InMemoryHistoryStore::new(), DEFAULT_THRESHOLD);
        let outcome = service
            .submit(submission("ethics", [8, 6, 9, 4]))
            .expect("valid submission");

        assert!((outcome.composite - 7.25).abs() < 1e-9);
        assert!(outcome.delta.is_none());
        assert!(outcome.persisted);
        assert_eq!(service.history().len(), 1);
    }

    #[test]
    fn second_submission_reports_the_delta_against_the_first() {
        let mut service = AssessmentService::new(InMemoryHistoryStore::new(), DEFAULT_THRESHOLD);
        // Ethics weights on means {6, 6, 8, 6} give a 6.50 baseline.
        service
            .submit(submission("ethics", [6, 6, 8, 6]))
            .expect("first submission");
        let outcome = service
            .submit(submission("ethics", [8, 6, 9, 4]))
            .expect("second submission");

        let delta = outcome.delta.expect("previous record exists");
        assert!((delta.composite - 0.75).abs() < 1e-9);
        assert_eq!(service.history().len(), 2);
    }

    #[test]
    fn weak_dimensions_surface_their_recommendations() {
        let mut service = AssessmentService::new(InMemoryHistoryStore::new(), DEFAULT_THRESHOLD);
        let outcome = service
            .submit(submission("ethics", [8, 6, 9, 4]))
            .expect("valid submission");

        let keys: Vec<Dimension> = outcome.recommendations.keys().copied().collect();
        assert_eq!(keys, vec![Dimension::Correction, Dimension::Creativity]);
        assert_eq!(outcome.recommendations[&Dimension::Correction].len(), 3);
    }

    #[test]
    fn latest_outcome_rebuilds_from_the_stored_tail() {
        let mut service = AssessmentService::new(InMemoryHistoryStore::new(), DEFAULT_THRESHOLD);
        service
            .submit(submission("ethics", [5, 5, 5, 5]))
            .expect("first submission");
        service
            .submit(submission("ai", [8, 6, 9, 4]))
            .expect("second submission");

        let latest = service.latest_outcome().expect("history non-empty");
        assert_eq!(latest.context, "ai");
        assert!(latest.delta.is_some());
        assert!(latest.recommendations.contains_key(&Dimension::Creativity));
    }

    #[test]
    fn summary_tracks_count_latest_and_mean() {
        let mut service = AssessmentService::new(InMemoryHistoryStore::new(), DEFAULT_THRESHOLD);
        assert!(summarize(&service.history()).is_none());

        service
            .submit(submission("ethics", [6, 6, 8, 6]))
            .expect("first submission");
        service
            .submit(submission("ethics", [8, 6, 9, 4]))
            .expect("second submission");

        let summary = summarize(&service.history()).expect("two records");
        assert_eq!(summary.assessments, 2);
        assert!((summary.latest_composite - 7.25).abs() < 1e-9);
        assert!((summary.latest_delta.expect("delta present") - 0.75).abs() < 1e-9);
        assert!((summary.mean_composite - 6.875).abs() < 1e-9);
    }
}

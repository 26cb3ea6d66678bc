use super::domain::{Dimension, HistoryRecord, ScoreDelta};
use super::scoring::ScoredAssessment;
use std::collections::BTreeMap;

/// Compares a freshly scored assessment against the last record of the
/// history as it stood *before* this assessment is appended.
///
/// The comparison deliberately ignores the context of either record: the
/// previous result is the previous result, whatever profile produced it.
pub fn against_previous(
    current: &ScoredAssessment,
    prior_records: &[HistoryRecord],
) -> Option<ScoreDelta> {
    let previous = prior_records.last()?;

    let mut dimensions = BTreeMap::new();
    for dimension in Dimension::ordered() {
        dimensions.insert(
            dimension,
            current.scores.get(dimension) - previous.scores.get(dimension),
        );
    }

    Some(ScoreDelta {
        composite: current.composite - previous.composite,
        dimensions,
    })
}

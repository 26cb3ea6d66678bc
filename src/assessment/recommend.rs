use super::catalog::GuidanceCatalog;
use super::domain::{Dimension, DimensionScores};
use std::collections::BTreeMap;

/// Default cutoff below which a dimension earns its guidance list.
pub const DEFAULT_THRESHOLD: f64 = 7.0;

/// Pure lookup mapping under-threshold dimensions to their fixed guidance.
#[derive(Debug)]
pub struct RecommendationSelector {
    catalog: GuidanceCatalog,
    threshold: f64,
}

impl RecommendationSelector {
    pub fn new(catalog: GuidanceCatalog, threshold: f64) -> Self {
        Self { catalog, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Dimensions strictly below the threshold, each with its full guidance
    /// list in original order. Dimensions at or above threshold are omitted
    /// entirely; whether to celebrate them is the presentation layer's call.
    pub fn recommend(&self, scores: &DimensionScores) -> BTreeMap<Dimension, Vec<&'static str>> {
        let mut selected = BTreeMap::new();
        for (dimension, score) in scores.iter() {
            if score < self.threshold {
                selected.insert(dimension, self.catalog.guidance(dimension).to_vec());
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    fn selector() -> RecommendationSelector {
        RecommendationSelector::new(GuidanceCatalog::standard(), DEFAULT_THRESHOLD)
    }

    fn scores(values: [f64; 4]) -> DimensionScores {
        let mut map = Map::new();
        for (dimension, value) in Dimension::ordered().into_iter().zip(values) {
            map.insert(dimension, value);
        }
        DimensionScores::new(map)
    }

    #[test]
    fn only_under_threshold_dimensions_are_selected() {
        let selected = selector().recommend(&scores([8.0, 6.0, 9.0, 4.0]));

        let keys: Vec<Dimension> = selected.keys().copied().collect();
        assert_eq!(keys, vec![Dimension::Correction, Dimension::Creativity]);
    }

    #[test]
    fn selected_dimension_carries_its_full_guidance_in_order() {
        let selected = selector().recommend(&scores([8.0, 6.0, 9.0, 8.0]));

        let guidance = selected
            .get(&Dimension::Correction)
            .expect("C is below threshold");
        let expected = GuidanceCatalog::standard();
        assert_eq!(guidance.as_slice(), expected.guidance(Dimension::Correction));
        assert_eq!(guidance.len(), 3);
    }

    #[test]
    fn score_exactly_at_threshold_is_omitted() {
        let selected = selector().recommend(&scores([7.0, 7.0, 7.0, 7.0]));
        assert!(selected.is_empty());
    }

    #[test]
    fn all_weak_dimensions_are_selected() {
        let selected = selector().recommend(&scores([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(selected.len(), 4);
    }
}

//! Feature-importance ranking.

use std::cmp::Ordering;

use forecast_core::types::FeatureImportanceEntry;

/// Pair feature names with their scores and sort descending by score.
/// The sort is stable, so equal scores retain the original column order.
/// Empty input yields an empty ranking.
pub fn rank_importances(names: &[&str], scores: &[f64]) -> Vec<FeatureImportanceEntry> {
    let mut entries: Vec<FeatureImportanceEntry> = names
        .iter()
        .zip(scores.iter())
        .map(|(name, &score)| FeatureImportanceEntry {
            feature: (*name).to_string(),
            score,
        })
        .collect();

    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_descending() {
        let ranked = rank_importances(&["budget", "channel", "duration"], &[0.2, 0.5, 0.3]);
        let order: Vec<&str> = ranked.iter().map(|e| e.feature.as_str()).collect();
        assert_eq!(order, vec!["channel", "duration", "budget"]);
    }

    #[test]
    fn test_ties_keep_column_order() {
        let ranked = rank_importances(&["budget", "channel", "audience"], &[0.25, 0.5, 0.25]);
        let order: Vec<&str> = ranked.iter().map(|e| e.feature.as_str()).collect();
        assert_eq!(order, vec!["channel", "budget", "audience"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_importances(&[], &[]).is_empty());
    }
}

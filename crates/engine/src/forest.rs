//! Random-forest outcome classifier — Gini decision trees over bootstrap
//! resamples with random feature subsampling, combined by majority vote.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use forecast_core::error::{ForecastError, ForecastResult};

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        label: bool,
    },
    Split {
        feature: usize,
        threshold: f64,
        n_samples: usize,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// Ensemble-of-trees binary classifier. Trains once, then answers predict
/// and feature-importance queries; immutable after `fit`.
///
/// Determinism is a property of the caller-supplied [`StdRng`]: resampling
/// and feature subsampling draw from it sequentially, so the same seed
/// reproduces identical trees, accuracy and importances.
#[derive(Debug)]
pub struct OutcomeForest {
    tree_count: usize,
    max_depth: usize,
    trees: Vec<TreeNode>,
    n_features: usize,
}

impl OutcomeForest {
    pub fn new(tree_count: usize, max_depth: usize) -> Self {
        Self {
            tree_count,
            max_depth,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    pub fn is_trained(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Fit the ensemble. Each tree is grown on a bootstrap resample of the
    /// training partition (sampling with replacement, same size) and
    /// considers a random `ceil(sqrt(n_features))` subset of features at
    /// each split.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[bool], rng: &mut StdRng) -> ForecastResult<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples == 0 || y.is_empty() {
            return Err(ForecastError::InsufficientData(
                "training partition is empty".into(),
            ));
        }
        if n_samples != y.len() {
            return Err(ForecastError::InsufficientData(format!(
                "{} feature rows but {} labels",
                n_samples,
                y.len()
            )));
        }
        let has_success = y.iter().any(|&v| v);
        let has_failure = y.iter().any(|&v| !v);
        if !has_success || !has_failure {
            return Err(ForecastError::InsufficientData(
                "training partition contains a single class".into(),
            ));
        }

        let features_per_split = ((n_features as f64).sqrt().ceil() as usize).max(1);

        self.trees = Vec::with_capacity(self.tree_count);
        for _ in 0..self.tree_count {
            let indices: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
            let tree = build_tree(x, y, &indices, 0, self.max_depth, features_per_split, rng);
            self.trees.push(tree);
        }
        self.n_features = n_features;

        debug!(
            trees = self.trees.len(),
            samples = n_samples,
            features = n_features,
            "Forest trained"
        );
        Ok(())
    }

    /// Majority vote across all trees for one encoded feature row.
    /// Ties resolve to failure, matching the lower class label.
    pub fn predict(&self, row: ArrayView1<'_, f64>) -> ForecastResult<bool> {
        if !self.is_trained() {
            return Err(ForecastError::NotTrained);
        }
        let success_votes = self
            .trees
            .iter()
            .filter(|tree| predict_tree(tree, row))
            .count();
        Ok(success_votes * 2 > self.trees.len())
    }

    /// Fraction of correctly predicted labels on a held-out partition.
    pub fn evaluate(&self, x: &Array2<f64>, y: &[bool]) -> ForecastResult<f64> {
        if !self.is_trained() {
            return Err(ForecastError::NotTrained);
        }
        if y.is_empty() || x.nrows() != y.len() {
            return Err(ForecastError::InsufficientData(
                "test partition is empty or mismatched".into(),
            ));
        }
        let mut correct = 0usize;
        for (row, &label) in x.rows().into_iter().zip(y.iter()) {
            if self.predict(row)? == label {
                correct += 1;
            }
        }
        Ok(correct as f64 / y.len() as f64)
    }

    /// Per-feature split-contribution scores, aggregated over all trees and
    /// sample-weighted, normalized to sum to 1.
    pub fn feature_importances(&self) -> ForecastResult<Vec<f64>> {
        if !self.is_trained() {
            return Err(ForecastError::NotTrained);
        }
        let mut importances = vec![0.0f64; self.n_features];
        for tree in &self.trees {
            accumulate_importances(tree, &mut importances);
        }
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for score in &mut importances {
                *score /= total;
            }
        } else {
            // Every tree degenerated to a single leaf; spread evenly so the
            // normalization invariant still holds.
            let uniform = 1.0 / self.n_features as f64;
            importances.fill(uniform);
        }
        Ok(importances)
    }
}

fn predict_tree(node: &TreeNode, row: ArrayView1<'_, f64>) -> bool {
    match node {
        TreeNode::Leaf { label } => *label,
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
            ..
        } => {
            if row[*feature] <= *threshold {
                predict_tree(left, row)
            } else {
                predict_tree(right, row)
            }
        }
    }
}

fn accumulate_importances(node: &TreeNode, importances: &mut [f64]) {
    if let TreeNode::Split {
        feature,
        n_samples,
        left,
        right,
        ..
    } = node
    {
        importances[*feature] += *n_samples as f64;
        accumulate_importances(left, importances);
        accumulate_importances(right, importances);
    }
}

fn majority_label(y: &[bool], indices: &[usize]) -> bool {
    let successes = indices.iter().filter(|&&i| y[i]).count();
    // Strict majority; ties fall to failure.
    successes * 2 > indices.len()
}

fn is_pure(y: &[bool], indices: &[usize]) -> bool {
    let first = y[indices[0]];
    indices.iter().all(|&i| y[i] == first)
}

fn gini(successes: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = successes as f64 / total as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

fn build_tree(
    x: &Array2<f64>,
    y: &[bool],
    indices: &[usize],
    depth: usize,
    max_depth: usize,
    features_per_split: usize,
    rng: &mut StdRng,
) -> TreeNode {
    if indices.len() < 2 || depth >= max_depth || is_pure(y, indices) {
        return TreeNode::Leaf {
            label: majority_label(y, indices),
        };
    }

    let mut candidates: Vec<usize> = (0..x.ncols()).collect();
    candidates.shuffle(rng);
    candidates.truncate(features_per_split);

    let Some((feature, threshold)) = best_split(x, y, indices, &candidates) else {
        return TreeNode::Leaf {
            label: majority_label(y, indices),
        };
    };

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| x[[i, feature]] <= threshold);

    let left = build_tree(
        x,
        y,
        &left_indices,
        depth + 1,
        max_depth,
        features_per_split,
        rng,
    );
    let right = build_tree(
        x,
        y,
        &right_indices,
        depth + 1,
        max_depth,
        features_per_split,
        rng,
    );

    TreeNode::Split {
        feature,
        threshold,
        n_samples: indices.len(),
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Best Gini-gain split over the candidate features, trying midpoints
/// between consecutive unique values. Returns `None` when no split yields
/// positive gain.
fn best_split(
    x: &Array2<f64>,
    y: &[bool],
    indices: &[usize],
    candidates: &[usize],
) -> Option<(usize, f64)> {
    let total = indices.len();
    let total_successes = indices.iter().filter(|&&i| y[i]).count();
    let parent_impurity = gini(total_successes, total);

    let mut best: Option<(usize, f64)> = None;
    let mut best_gain = 0.0f64;

    for &feature in candidates {
        let mut values: Vec<f64> = indices.iter().map(|&i| x[[i, feature]]).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
        if values.len() < 2 {
            continue;
        }

        for window in values.windows(2) {
            let threshold = (window[0] + window[1]) / 2.0;

            let mut left_total = 0usize;
            let mut left_successes = 0usize;
            for &i in indices {
                if x[[i, feature]] <= threshold {
                    left_total += 1;
                    if y[i] {
                        left_successes += 1;
                    }
                }
            }
            let right_total = total - left_total;
            if left_total == 0 || right_total == 0 {
                continue;
            }
            let right_successes = total_successes - left_successes;

            let weighted = (left_total as f64 / total as f64) * gini(left_successes, left_total)
                + (right_total as f64 / total as f64) * gini(right_successes, right_total);
            let gain = parent_impurity - weighted;

            if gain > best_gain {
                best_gain = gain;
                best = Some((feature, threshold));
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Single separable feature: success iff x > 0.5.
    fn separable() -> (Array2<f64>, Vec<bool>) {
        let values: Vec<f64> = (0..20).map(|i| i as f64 / 20.0).collect();
        let labels: Vec<bool> = values.iter().map(|&v| v > 0.5).collect();
        let x = Array2::from_shape_vec((20, 1), values).unwrap();
        (x, labels)
    }

    #[test]
    fn test_fit_rejects_empty_partition() {
        let mut forest = OutcomeForest::new(10, 5);
        let x = Array2::<f64>::zeros((0, 5));
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            forest.fit(&x, &[], &mut rng),
            Err(ForecastError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_fit_rejects_single_class() {
        let mut forest = OutcomeForest::new(10, 5);
        let x = Array2::from_shape_vec((4, 1), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            forest.fit(&x, &[true, true, true, true], &mut rng),
            Err(ForecastError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let forest = OutcomeForest::new(10, 5);
        let row = ndarray::Array1::from_vec(vec![1.0]);
        assert!(matches!(
            forest.predict(row.view()),
            Err(ForecastError::NotTrained)
        ));
        assert!(matches!(
            forest.feature_importances(),
            Err(ForecastError::NotTrained)
        ));
    }

    #[test]
    fn test_learns_separable_data() {
        let (x, y) = separable();
        let mut forest = OutcomeForest::new(25, 10);
        let mut rng = StdRng::seed_from_u64(42);
        forest.fit(&x, &y, &mut rng).unwrap();

        let accuracy = forest.evaluate(&x, &y).unwrap();
        assert!(accuracy > 0.9, "accuracy was {accuracy}");

        let low = ndarray::Array1::from_vec(vec![0.1]);
        let high = ndarray::Array1::from_vec(vec![0.9]);
        assert!(!forest.predict(low.view()).unwrap());
        assert!(forest.predict(high.view()).unwrap());
    }

    #[test]
    fn test_accuracy_in_unit_interval() {
        let (x, y) = separable();
        let mut forest = OutcomeForest::new(5, 3);
        let mut rng = StdRng::seed_from_u64(9);
        forest.fit(&x, &y, &mut rng).unwrap();
        let accuracy = forest.evaluate(&x, &y).unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
    }

    #[test]
    fn test_importances_normalized_and_non_negative() {
        let (x, y) = separable();
        let mut forest = OutcomeForest::new(15, 8);
        let mut rng = StdRng::seed_from_u64(3);
        forest.fit(&x, &y, &mut rng).unwrap();

        let importances = forest.feature_importances().unwrap();
        assert_eq!(importances.len(), 1);
        let sum: f64 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(importances.iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_same_seed_reproduces_forest() {
        let (x, y) = separable();

        let run = |seed: u64| {
            let mut forest = OutcomeForest::new(20, 10);
            let mut rng = StdRng::seed_from_u64(seed);
            forest.fit(&x, &y, &mut rng).unwrap();
            let accuracy = forest.evaluate(&x, &y).unwrap();
            let importances = forest.feature_importances().unwrap();
            (accuracy, importances)
        };

        let (acc_a, imp_a) = run(42);
        let (acc_b, imp_b) = run(42);
        assert_eq!(acc_a, acc_b);
        assert_eq!(imp_a, imp_b);
    }
}

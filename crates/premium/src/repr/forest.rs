//! Tree ensembles: boosted sums and averaged forests.

use ndarray::{Array1, ArrayView2};

use super::{tree::TreeValidationError, Tree};

/// How the outputs of individual trees are combined.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Aggregation {
    /// `base_score + Σ leaf` (gradient boosting).
    #[default]
    Sum,
    /// `base_score + Σ weight_i · leaf_i` (DART boosting).
    WeightedSum(Box<[f64]>),
    /// `base_score + mean(leaf)` (random forest, single decision tree).
    Mean,
}

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForestValidationError {
    #[error("forest has no trees")]
    Empty,
    #[error("forest has {n_trees} trees but {len} tree weights")]
    WeightsLenMismatch { n_trees: usize, len: usize },
    #[error("tree {tree_idx} splits on feature {required} but the forest declares {n_features} features")]
    FeatureOutOfRange {
        tree_idx: usize,
        required: usize,
        n_features: usize,
    },
    #[error("tree {tree_idx}: {error}")]
    InvalidTree {
        tree_idx: usize,
        error: TreeValidationError,
    },
}

/// Single-output forest of decision trees.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<Tree>,
    aggregation: Aggregation,
    base_score: f64,
    n_features: usize,
}

impl Forest {
    /// Create an empty forest evaluated on `n_features` inputs.
    pub fn new(n_features: usize, aggregation: Aggregation) -> Self {
        Self {
            trees: Vec::new(),
            aggregation,
            base_score: 0.0,
            n_features,
        }
    }

    /// Set the starting score added before tree outputs.
    pub fn with_base_score(mut self, base_score: f64) -> Self {
        self.base_score = base_score;
        self
    }

    /// Add a tree to the forest.
    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of input features the forest was trained on.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    #[inline]
    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Total node count over all trees.
    pub fn n_nodes(&self) -> usize {
        self.trees.iter().map(Tree::n_nodes).sum()
    }

    /// Validate structural invariants (non-empty, weights, feature bounds, trees).
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        if self.trees.is_empty() {
            return Err(ForestValidationError::Empty);
        }
        if let Aggregation::WeightedSum(weights) = &self.aggregation {
            if weights.len() != self.trees.len() {
                return Err(ForestValidationError::WeightsLenMismatch {
                    n_trees: self.trees.len(),
                    len: weights.len(),
                });
            }
        }

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;

            let required = tree.required_features();
            if required > self.n_features {
                return Err(ForestValidationError::FeatureOutOfRange {
                    tree_idx,
                    required,
                    n_features: self.n_features,
                });
            }
        }

        Ok(())
    }

    /// Predict a single row.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        let leaves = self.trees.iter().map(|tree| tree.predict_row(features));

        let combined = match &self.aggregation {
            Aggregation::Sum => leaves.fold(0.0, |acc, v| acc + v),
            Aggregation::WeightedSum(weights) => leaves
                .zip(weights.iter())
                .fold(0.0, |acc, (v, w)| acc + v * w),
            Aggregation::Mean => {
                if self.trees.is_empty() {
                    0.0
                } else {
                    leaves.sum::<f64>() / self.trees.len() as f64
                }
            }
        };

        self.base_score + combined
    }

    /// Predict every row of a `(n_rows, n_features)` matrix.
    pub fn predict_batch(&self, rows: ArrayView2<'_, f64>) -> Array1<f64> {
        rows.outer_iter()
            .map(|row| match row.as_slice() {
                Some(slice) => self.predict_row(slice),
                None => self.predict_row(&row.to_vec()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repr::tree::tests::stump;
    use crate::repr::SplitRule;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn sum_adds_base_score_and_leaves() {
        let mut forest = Forest::new(1, Aggregation::Sum).with_base_score(0.5);
        forest.push_tree(stump(SplitRule::LessThan, 0, 0.5, 1.0, 2.0));
        forest.push_tree(stump(SplitRule::LessThan, 0, 0.5, 0.5, 1.5));

        assert_eq!(forest.predict_row(&[0.3]), 2.0);
        assert_eq!(forest.predict_row(&[0.7]), 4.0);
    }

    #[test]
    fn weighted_sum_scales_each_tree() {
        let weights = vec![1.0, 0.5].into_boxed_slice();
        let mut forest = Forest::new(1, Aggregation::WeightedSum(weights));
        forest.push_tree(stump(SplitRule::LessThan, 0, 0.5, 1.0, 2.0));
        forest.push_tree(stump(SplitRule::LessThan, 0, 0.5, 2.0, 4.0));

        assert_eq!(forest.predict_row(&[0.3]), 2.0);
        assert_eq!(forest.predict_row(&[0.7]), 4.0);
    }

    #[test]
    fn mean_averages_trees() {
        let mut forest = Forest::new(1, Aggregation::Mean);
        forest.push_tree(stump(SplitRule::LessOrEqual, 0, 0.5, 9.0, 10.0));
        forest.push_tree(stump(SplitRule::LessOrEqual, 0, 0.5, 8.0, 11.0));
        forest.push_tree(stump(SplitRule::LessOrEqual, 0, 0.5, 10.0, 12.0));

        assert_abs_diff_eq!(forest.predict_row(&[0.5]), 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(forest.predict_row(&[0.6]), 11.0, epsilon = 1e-12);
    }

    #[test]
    fn predict_batch_matches_predict_row() {
        let mut forest = Forest::new(2, Aggregation::Sum).with_base_score(0.1);
        forest.push_tree(stump(SplitRule::LessThan, 0, 0.5, 1.0, 2.0));
        forest.push_tree(stump(SplitRule::LessThan, 1, 3.0, -1.0, 1.0));

        let rows = array![[0.3, 1.0], [0.7, 5.0], [0.5, 3.0]];
        let batch = forest.predict_batch(rows.view());

        for (i, row) in rows.outer_iter().enumerate() {
            let single = forest.predict_row(row.as_slice().unwrap());
            assert_abs_diff_eq!(batch[i], single, epsilon = 1e-12);
        }
        // Column views are not contiguous; the batch path must still work.
        let transposed = rows.t().to_owned();
        let cols = forest.predict_batch(transposed.t());
        assert_eq!(cols, batch);
    }

    #[test]
    fn validate_catches_structural_problems() {
        assert_eq!(
            Forest::new(1, Aggregation::Sum).validate(),
            Err(ForestValidationError::Empty)
        );

        let mut forest = Forest::new(1, Aggregation::WeightedSum(vec![1.0].into_boxed_slice()));
        forest.push_tree(stump(SplitRule::LessThan, 0, 0.5, 1.0, 2.0));
        forest.push_tree(stump(SplitRule::LessThan, 0, 0.5, 1.0, 2.0));
        assert_eq!(
            forest.validate(),
            Err(ForestValidationError::WeightsLenMismatch { n_trees: 2, len: 1 })
        );

        let mut forest = Forest::new(3, Aggregation::Sum);
        forest.push_tree(stump(SplitRule::LessThan, 5, 0.5, 1.0, 2.0));
        assert_eq!(
            forest.validate(),
            Err(ForestValidationError::FeatureOutOfRange {
                tree_idx: 0,
                required: 6,
                n_features: 3
            })
        );
    }
}

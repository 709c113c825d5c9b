//! Conversion from scikit-learn exports to native types.

use ndarray::{Array1, Array2};

use crate::compat::ConversionError;
use crate::repr::{
    Aggregation, Forest, LinearModel, PolynomialFeatures, SplitRule, StandardScaler, Tree,
    TreeBuilder,
};

use super::json::{
    SkDecisionTree, SkLinear, SkPoly, SkPolynomialBundle, SkRandomForest, SkScaler, SkTree,
};

/// scikit-learn's `TREE_LEAF` sentinel.
const TREE_LEAF: i64 = -1;

impl SkTree {
    /// Convert the `tree_` arrays into a native [`Tree`] (`<=` splits).
    pub fn to_tree(&self, tree_idx: usize) -> Result<Tree, ConversionError> {
        let num_nodes = self.children_left.len();
        if num_nodes == 0 {
            return Err(ConversionError::EmptyTree(tree_idx));
        }

        for (field, actual) in [
            ("children_right", self.children_right.len()),
            ("feature", self.feature.len()),
            ("threshold", self.threshold.len()),
            ("value", self.value.len()),
        ] {
            if actual != num_nodes {
                return Err(ConversionError::ArrayLengthMismatch {
                    tree: tree_idx,
                    field,
                    actual,
                    expected: num_nodes,
                });
            }
        }

        let mut builder = TreeBuilder::with_nodes(num_nodes, SplitRule::LessOrEqual);

        for node in 0..num_nodes {
            let left = self.children_left[node];
            let right = self.children_right[node];

            if left == TREE_LEAF {
                builder.set_leaf(node as u32, self.value[node]);
                continue;
            }

            for child in [left, right] {
                if child < 0 || child as usize >= num_nodes {
                    return Err(ConversionError::InvalidNodeIndex {
                        tree: tree_idx,
                        node,
                        child,
                        num_nodes,
                    });
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature > i64::from(u32::MAX) {
                return Err(ConversionError::InvalidFeatureIndex {
                    tree: tree_idx,
                    node,
                    feature,
                });
            }

            let default_left = self.missing_go_to_left.get(node).is_some_and(|&m| m != 0);
            builder.set_split(
                node as u32,
                feature as u32,
                self.threshold[node],
                default_left,
                left as u32,
                right as u32,
            );
        }

        builder
            .build()
            .map_err(|source| ConversionError::InvalidTree {
                tree: tree_idx,
                source,
            })
    }
}

/// Declared feature count, falling back to the widest split.
fn declared_features(declared: Option<usize>, trees: &[Tree], tree_declared: Option<usize>) -> usize {
    declared.or(tree_declared).unwrap_or_else(|| {
        trees
            .iter()
            .map(Tree::required_features)
            .max()
            .unwrap_or(0)
    })
}

fn mean_forest(trees: Vec<Tree>, n_features: usize) -> Result<Forest, ConversionError> {
    let mut forest = Forest::new(n_features, Aggregation::Mean);
    for tree in trees {
        forest.push_tree(tree);
    }
    forest.validate()?;
    Ok(forest)
}

impl SkDecisionTree {
    /// A single tree is a one-member averaged forest.
    pub fn to_forest(&self) -> Result<Forest, ConversionError> {
        let trees = vec![self.tree.to_tree(0)?];
        let n_features = declared_features(self.n_features_in, &trees, self.tree.n_features);
        mean_forest(trees, n_features)
    }
}

impl SkRandomForest {
    /// Average of all estimators.
    pub fn to_forest(&self) -> Result<Forest, ConversionError> {
        if self.estimators.is_empty() {
            return Err(ConversionError::EmptyEnsemble);
        }
        let trees = self
            .estimators
            .iter()
            .enumerate()
            .map(|(idx, tree)| tree.to_tree(idx))
            .collect::<Result<Vec<_>, _>>()?;
        let tree_declared = self.estimators.iter().find_map(|t| t.n_features);
        let n_features = declared_features(self.n_features_in, &trees, tree_declared);
        mean_forest(trees, n_features)
    }
}

impl SkScaler {
    pub fn to_scaler(&self) -> Result<StandardScaler, ConversionError> {
        Ok(StandardScaler::from_parts(
            Array1::from(self.mean.clone()),
            Array1::from(self.scale.clone()),
        )?)
    }
}

impl SkLinear {
    pub fn to_linear(&self) -> Result<LinearModel, ConversionError> {
        let intercept = match self.intercept.as_slice() {
            [value] => *value,
            other => {
                return Err(ConversionError::ShapeMismatch {
                    what: "linear intercept",
                    expected: 1,
                    actual: other.len(),
                })
            }
        };
        Ok(LinearModel::new(Array1::from(self.coef.clone()), intercept))
    }

    /// The bundled scaler, checked against the coefficient count.
    pub fn to_scaler(&self) -> Result<Option<StandardScaler>, ConversionError> {
        let Some(scaler) = &self.scaler else {
            return Ok(None);
        };
        let scaler = scaler.to_scaler()?;
        if scaler.n_features() != self.coef.len() {
            return Err(ConversionError::ShapeMismatch {
                what: "linear scaler",
                expected: self.coef.len(),
                actual: scaler.n_features(),
            });
        }
        Ok(Some(scaler))
    }
}

impl SkPoly {
    pub fn to_expander(&self) -> Result<PolynomialFeatures, ConversionError> {
        let n_inputs = self.n_features_in;

        if let Some(rows) = &self.powers {
            if let Some(row) = rows.iter().position(|r| r.len() != n_inputs) {
                return Err(ConversionError::InvalidPolynomial(format!(
                    "powers row {row} has {} exponents, expected {n_inputs}",
                    rows[row].len()
                )));
            }
            let flat: Vec<u32> = rows.iter().flatten().copied().collect();
            let powers = Array2::from_shape_vec((rows.len(), n_inputs), flat)
                .map_err(|e| ConversionError::InvalidPolynomial(e.to_string()))?;
            return Ok(PolynomialFeatures::from_powers(powers));
        }

        match self.degree {
            Some(degree) => Ok(PolynomialFeatures::from_degree(
                n_inputs,
                degree,
                self.include_bias,
                self.interaction_only,
            )),
            None => Err(ConversionError::InvalidPolynomial(
                "neither `powers` nor `degree` is present".to_string(),
            )),
        }
    }
}

impl SkPolynomialBundle {
    /// Convert to `(expander, scaler, model)` with consistent widths.
    pub fn to_parts(
        &self,
    ) -> Result<(PolynomialFeatures, StandardScaler, LinearModel), ConversionError> {
        let expander = self.poly_transformer.to_expander()?;
        let scaler = self.scaler.to_scaler()?;
        let model = self.model.to_linear()?;

        if scaler.n_features() != expander.n_outputs() {
            return Err(ConversionError::ShapeMismatch {
                what: "polynomial scaler",
                expected: expander.n_outputs(),
                actual: scaler.n_features(),
            });
        }
        if model.n_features() != expander.n_outputs() {
            return Err(ConversionError::ShapeMismatch {
                what: "polynomial coefficients",
                expected: expander.n_outputs(),
                actual: model.n_features(),
            });
        }

        Ok((expander, scaler, model))
    }
}

//! Conversion from XGBoost JSON types to native [`Forest`]s.

use crate::compat::ConversionError;
use crate::repr::{Aggregation, Forest, SplitRule, Tree, TreeBuilder};

use super::json::{GradientBooster, ModelTrees, Tree as XgbTree, XgbModel};

/// Convert base_score from probability space to margin space based on objective.
///
/// XGBoost stores base_score in the objective's output space, while trees add
/// up in margin space. This mirrors XGBoost's `ProbToMargin`.
pub fn prob_to_margin(base_score: f32, objective: &str) -> f32 {
    match objective {
        "binary:logistic" | "reg:logistic" => {
            let p = base_score.clamp(1e-7, 1.0 - 1e-7);
            (p / (1.0 - p)).ln()
        }
        "reg:gamma" | "reg:tweedie" | "count:poisson" => base_score.max(1e-7).ln(),
        _ => base_score,
    }
}

impl XgbModel {
    /// Returns true if this model uses DART booster.
    pub fn is_dart(&self) -> bool {
        matches!(&self.learner.gradient_booster, GradientBooster::Dart { .. })
    }

    /// Number of input features declared by the learner.
    pub fn n_features(&self) -> usize {
        self.learner.learner_model_param.n_features.max(0) as usize
    }

    /// Convert to a native single-output [`Forest`].
    ///
    /// gbtree boosters sum their trees; DART boosters weight each tree by its
    /// `weight_drop` entry. gblinear and multi-output models are rejected.
    pub fn to_forest(&self) -> Result<Forest, ConversionError> {
        let (model_trees, aggregation) = match &self.learner.gradient_booster {
            GradientBooster::Gbtree { model } => (model, Aggregation::Sum),
            GradientBooster::Dart {
                gbtree,
                weight_drop,
            } => {
                let weights: Box<[f64]> = weight_drop.iter().map(|&w| f64::from(w)).collect();
                (&gbtree.model, Aggregation::WeightedSum(weights))
            }
            GradientBooster::Gblinear { .. } => return Err(ConversionError::LinearBooster),
        };

        let param = &self.learner.learner_model_param;
        let n_outputs = param.n_class.max(param.num_target).max(1) as usize;
        if n_outputs != 1 {
            return Err(ConversionError::ShapeMismatch {
                what: "xgboost output groups",
                expected: 1,
                actual: n_outputs,
            });
        }
        if model_trees.num_trees() == 0 {
            return Err(ConversionError::EmptyEnsemble);
        }

        let margin_base_score = prob_to_margin(param.base_score, &self.learner.objective.name);
        let mut forest =
            Forest::new(self.n_features(), aggregation).with_base_score(f64::from(margin_base_score));

        for tree in convert_trees(model_trees)? {
            forest.push_tree(tree);
        }
        forest.validate()?;

        Ok(forest)
    }
}

fn convert_trees(model_trees: &ModelTrees) -> Result<Vec<Tree>, ConversionError> {
    model_trees
        .trees
        .iter()
        .enumerate()
        .map(|(tree_idx, xgb_tree)| convert_tree(xgb_tree, tree_idx))
        .collect()
}

/// Convert a single XGBoost tree to native [`Tree`].
fn convert_tree(xgb_tree: &XgbTree, tree_idx: usize) -> Result<Tree, ConversionError> {
    let num_nodes = xgb_tree.tree_param.num_nodes.max(0) as usize;
    if num_nodes == 0 {
        return Err(ConversionError::EmptyTree(tree_idx));
    }

    let check_len = |field: &'static str, actual: usize| {
        if actual < num_nodes {
            Err(ConversionError::ArrayLengthMismatch {
                tree: tree_idx,
                field,
                actual,
                expected: num_nodes,
            })
        } else {
            Ok(())
        }
    };
    check_len("base_weights", xgb_tree.base_weights.len())?;
    check_len("left_children", xgb_tree.left_children.len())?;
    check_len("right_children", xgb_tree.right_children.len())?;
    check_len("split_indices", xgb_tree.split_indices.len())?;
    check_len("split_conditions", xgb_tree.split_conditions.len())?;
    check_len("default_left", xgb_tree.default_left.len())?;

    let mut builder = TreeBuilder::with_nodes(num_nodes, SplitRule::LessThan);

    for node_idx in 0..num_nodes {
        let left_child = xgb_tree.left_children[node_idx];
        let right_child = xgb_tree.right_children[node_idx];

        if left_child == -1 {
            builder.set_leaf(node_idx as u32, f64::from(xgb_tree.base_weights[node_idx]));
            continue;
        }

        for child in [left_child, right_child] {
            if child < 0 || child as usize >= num_nodes {
                return Err(ConversionError::InvalidNodeIndex {
                    tree: tree_idx,
                    node: node_idx,
                    child: i64::from(child),
                    num_nodes,
                });
            }
        }

        let is_categorical = xgb_tree.split_type.get(node_idx).copied().unwrap_or(0) == 1
            || xgb_tree.categories_nodes.contains(&(node_idx as i32));
        if is_categorical {
            return Err(ConversionError::UnsupportedCategoricalSplit {
                tree: tree_idx,
                node: node_idx,
            });
        }

        let feature = xgb_tree.split_indices[node_idx];
        if feature < 0 {
            return Err(ConversionError::InvalidFeatureIndex {
                tree: tree_idx,
                node: node_idx,
                feature: i64::from(feature),
            });
        }

        builder.set_split(
            node_idx as u32,
            feature as u32,
            f64::from(xgb_tree.split_conditions[node_idx]),
            xgb_tree.default_left[node_idx] != 0,
            left_child as u32,
            right_child as u32,
        );
    }

    builder
        .build()
        .map_err(|source| ConversionError::InvalidTree {
            tree: tree_idx,
            source,
        })
}

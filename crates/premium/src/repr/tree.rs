//! Canonical tree representation (SoA) with numeric splits.
//!
//! One [`Tree`] type serves XGBoost boosters and scikit-learn estimators alike;
//! the only behavioural difference between the two, the comparison at a split,
//! is captured by [`SplitRule`].
//!
//! Trees are assembled with [`TreeBuilder`], which validates the structure on
//! [`build`](TreeBuilder::build) so a traversal can never loop or index out of
//! bounds.

use super::NodeId;

// ============================================================================
// SplitRule
// ============================================================================

/// Comparison used at every split node of a tree.
///
/// Feature values are narrowed to `f32` before comparing: both XGBoost's
/// `DMatrix` and scikit-learn's tree predictors store inputs as 32-bit floats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitRule {
    /// `value < threshold` goes left (XGBoost).
    #[default]
    LessThan,
    /// `value <= threshold` goes left (scikit-learn).
    LessOrEqual,
}

impl SplitRule {
    #[inline]
    pub fn goes_left(self, value: f64, threshold: f64) -> bool {
        let value = f64::from(value as f32);
        match self {
            SplitRule::LessThan => value < threshold,
            SplitRule::LessOrEqual => value <= threshold,
        }
    }
}

// ============================================================================
// TreeValidationError
// ============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,
    #[error("node {node} has {side} child {child} but the tree has {n_nodes} nodes")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    #[error("node {node} references itself as a child")]
    SelfLoop { node: NodeId },
    #[error("node {node} is reachable through more than one path")]
    DuplicateVisit { node: NodeId },
    #[error("leaf {node} has a non-finite value")]
    NonFiniteLeaf { node: NodeId },
}

// ============================================================================
// Tree
// ============================================================================

/// Structure-of-Arrays tree storage.
///
/// Child indices are local to this tree (0 = root).
#[derive(Debug, Clone)]
pub struct Tree {
    split_indices: Box<[u32]>,
    thresholds: Box<[f64]>,
    left_children: Box<[NodeId]>,
    right_children: Box<[NodeId]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
    rule: SplitRule,
}

impl Tree {
    /// Number of nodes (splits + leaves).
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&leaf| leaf).count()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn threshold(&self, node: NodeId) -> f64 {
        self.thresholds[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f64 {
        self.leaf_values[node as usize]
    }

    #[inline]
    pub fn rule(&self) -> SplitRule {
        self.rule
    }

    /// Smallest feature count this tree can be evaluated on.
    pub fn required_features(&self) -> usize {
        (0..self.n_nodes())
            .filter(|&n| !self.is_leaf[n])
            .map(|n| self.split_indices[n] as usize + 1)
            .max()
            .unwrap_or(0)
    }

    /// Walk from the root to a leaf for one sample.
    ///
    /// NaN values and features past the end of `features` follow the node's
    /// default direction.
    #[inline]
    pub fn traverse_to_leaf(&self, features: &[f64]) -> NodeId {
        let mut node: NodeId = 0;

        while !self.is_leaf(node) {
            let idx = node as usize;
            let value = features
                .get(self.split_indices[idx] as usize)
                .copied()
                .unwrap_or(f64::NAN);

            let left = if value.is_nan() {
                self.default_left[idx]
            } else {
                self.rule.goes_left(value, self.thresholds[idx])
            };

            node = if left {
                self.left_children[idx]
            } else {
                self.right_children[idx]
            };
        }

        node
    }

    /// Predict the leaf value for one sample.
    #[inline]
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        self.leaf_value(self.traverse_to_leaf(features))
    }

    /// Check that every node reachable from the root is visited exactly once
    /// and every child pointer is in bounds.
    ///
    /// Unreachable nodes are tolerated: XGBoost keeps pruned nodes in place.
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        let mut visited = vec![false; n_nodes];
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(node) = stack.pop() {
            let idx = node as usize;
            if visited[idx] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[idx] = true;

            if self.is_leaf[idx] {
                if !self.leaf_values[idx].is_finite() {
                    return Err(TreeValidationError::NonFiniteLeaf { node });
                }
                continue;
            }

            for (side, child) in [
                ("left", self.left_children[idx]),
                ("right", self.right_children[idx]),
            ] {
                if child == node {
                    return Err(TreeValidationError::SelfLoop { node });
                }
                if child as usize >= n_nodes {
                    return Err(TreeValidationError::ChildOutOfBounds {
                        node,
                        side,
                        child,
                        n_nodes,
                    });
                }
                stack.push(child);
            }
        }

        Ok(())
    }
}

// ============================================================================
// TreeBuilder
// ============================================================================

/// Node-by-node tree construction used by the artifact converters.
///
/// All nodes start as zero-valued leaves; converters then mark splits.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    split_indices: Vec<u32>,
    thresholds: Vec<f64>,
    left_children: Vec<NodeId>,
    right_children: Vec<NodeId>,
    default_left: Vec<bool>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f64>,
    rule: SplitRule,
}

impl TreeBuilder {
    /// Create a builder with `n_nodes` nodes, all leaves.
    pub fn with_nodes(n_nodes: usize, rule: SplitRule) -> Self {
        Self {
            split_indices: vec![0; n_nodes],
            thresholds: vec![0.0; n_nodes],
            left_children: vec![0; n_nodes],
            right_children: vec![0; n_nodes],
            default_left: vec![false; n_nodes],
            is_leaf: vec![true; n_nodes],
            leaf_values: vec![0.0; n_nodes],
            rule,
        }
    }

    /// Turn a node into a leaf with the given value.
    pub fn set_leaf(&mut self, node: NodeId, value: f64) -> &mut Self {
        let idx = node as usize;
        self.is_leaf[idx] = true;
        self.leaf_values[idx] = value;
        self
    }

    /// Turn a node into a numeric split.
    pub fn set_split(
        &mut self,
        node: NodeId,
        feature: u32,
        threshold: f64,
        default_left: bool,
        left: NodeId,
        right: NodeId,
    ) -> &mut Self {
        let idx = node as usize;
        self.is_leaf[idx] = false;
        self.split_indices[idx] = feature;
        self.thresholds[idx] = threshold;
        self.default_left[idx] = default_left;
        self.left_children[idx] = left;
        self.right_children[idx] = right;
        self
    }

    /// Freeze into an immutable [`Tree`], validating the structure.
    pub fn build(self) -> Result<Tree, TreeValidationError> {
        let tree = Tree {
            split_indices: self.split_indices.into_boxed_slice(),
            thresholds: self.thresholds.into_boxed_slice(),
            left_children: self.left_children.into_boxed_slice(),
            right_children: self.right_children.into_boxed_slice(),
            default_left: self.default_left.into_boxed_slice(),
            is_leaf: self.is_leaf.into_boxed_slice(),
            leaf_values: self.leaf_values.into_boxed_slice(),
            rule: self.rule,
        };
        tree.validate()?;
        Ok(tree)
    }
}

//! Native representations of the trained artifacts.
//!
//! Every artifact format in [`crate::compat`] converts into these types, so the
//! inference code never sees foreign schemas:
//!
//! - [`Tree`] / [`Forest`]: XGBoost boosters, decision trees and random forests
//! - [`LinearModel`]: ordinary least squares weights + intercept
//! - [`StandardScaler`] / [`PolynomialFeatures`]: fitted feature transforms

/// Node identifier: an index into a tree's SoA arrays.
pub type NodeId = u32;

pub mod forest;
pub mod linear;
pub mod transform;
pub mod tree;

pub use forest::{Aggregation, Forest, ForestValidationError};
pub use linear::LinearModel;
pub use transform::{PolynomialFeatures, StandardScaler, TransformError};
pub use tree::{SplitRule, Tree, TreeBuilder, TreeValidationError};

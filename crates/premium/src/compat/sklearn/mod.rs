//! scikit-learn estimator exports.
//!
//! Pickled estimators are not portable outside Python, so the trained
//! estimators are exported to JSON holding their fitted attributes
//! (`tree_` arrays, `coef_`, `mean_`/`scale_`, `powers_`). This module parses
//! those documents and converts them to native types.

mod convert;
mod json;

pub use json::*;

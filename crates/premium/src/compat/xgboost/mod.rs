//! XGBoost JSON model format support.
//!
//! This module provides parsing of XGBoost's JSON model format and conversion
//! to a native [`Forest`](crate::repr::Forest).

mod convert;
mod json;

pub use convert::prob_to_margin;
pub use json::*;

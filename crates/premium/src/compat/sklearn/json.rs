//! JSON schema of exported scikit-learn estimators.
//!
//! Field names follow the fitted attributes of the estimators. The trailing
//! underscore of scikit-learn's attribute names is optional (`coef` and
//! `coef_` both parse).

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{serde_as, OneOrMany};

/// `tree_.value` is `(n_nodes, n_outputs, max_n_classes)`; exports flatten it
/// to any depth. Single-output regression only needs the first entry per node.
fn deserialize_node_values<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    fn first_number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::Array(items) => items.first().and_then(first_number),
            _ => None,
        }
    }

    Vec::<Value>::deserialize(deserializer)?
        .iter()
        .enumerate()
        .map(|(node, value)| {
            first_number(value)
                .ok_or_else(|| SerdeError::custom(format!("node {node} has no numeric value")))
        })
        .collect()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Trees
// =============================================================================

/// The low-level `tree_` arrays of a fitted decision tree.
///
/// Leaves have `children_left[i] == -1`; split nodes send a sample left when
/// `x[feature[i]] <= threshold[i]`.
#[derive(Debug, Clone, Deserialize)]
pub struct SkTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    #[serde(deserialize_with = "deserialize_node_values")]
    pub value: Vec<f64>,
    /// Present for trees fitted on data with missing values (scikit-learn >= 1.3).
    #[serde(default)]
    pub missing_go_to_left: Vec<u8>,
    #[serde(default)]
    pub n_features: Option<usize>,
}

/// `DecisionTreeRegressor` export.
#[derive(Debug, Clone, Deserialize)]
pub struct SkDecisionTree {
    #[serde(alias = "tree_")]
    pub tree: SkTree,
    #[serde(default, alias = "n_features_in_")]
    pub n_features_in: Option<usize>,
}

/// `RandomForestRegressor` export: one `tree_` per estimator.
#[derive(Debug, Clone, Deserialize)]
pub struct SkRandomForest {
    #[serde(alias = "estimators_")]
    pub estimators: Vec<SkTree>,
    #[serde(default, alias = "n_features_in_")]
    pub n_features_in: Option<usize>,
}

// =============================================================================
// Linear models and transforms
// =============================================================================

/// `StandardScaler` export.
#[derive(Debug, Clone, Deserialize)]
pub struct SkScaler {
    #[serde(alias = "mean_")]
    pub mean: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
}

/// `LinearRegression` export, optionally with the scaler it was trained behind.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct SkLinear {
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(alias = "coef_")]
    pub coef: Vec<f64>,
    #[serde_as(as = "OneOrMany<_>")]
    #[serde(alias = "intercept_")]
    pub intercept: Vec<f64>,
    #[serde(default)]
    pub scaler: Option<SkScaler>,
}

/// `PolynomialFeatures` export.
///
/// Either the fitted exponent matrix (`powers_`) or the constructor
/// parameters; the matrix wins when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct SkPoly {
    #[serde(alias = "n_features_in_")]
    pub n_features_in: usize,
    #[serde(default, alias = "powers_")]
    pub powers: Option<Vec<Vec<u32>>>,
    #[serde(default)]
    pub degree: Option<u32>,
    #[serde(default = "default_true")]
    pub include_bias: bool,
    #[serde(default)]
    pub interaction_only: bool,
}

/// Polynomial regression bundle: expander, scaler and the linear model fitted
/// on the scaled expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct SkPolynomialBundle {
    pub model: SkLinear,
    pub poly_transformer: SkPoly,
    pub scaler: SkScaler,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_values_flatten_any_nesting() {
        let tree: SkTree = serde_json::from_value(json!({
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [0, -2, -2],
            "threshold": [0.5, -2.0, -2.0],
            "value": [[[9.1]], [8.8], 9.4]
        }))
        .unwrap();
        assert_eq!(tree.value, vec![9.1, 8.8, 9.4]);
        assert_eq!(tree.n_features, None);

        let bad = serde_json::from_value::<SkTree>(json!({
            "children_left": [-1], "children_right": [-1], "feature": [-2],
            "threshold": [-2.0], "value": [[]]
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn trailing_underscore_aliases() {
        let linear: SkLinear = serde_json::from_value(json!({
            "coef_": [0.5, 0.25],
            "intercept_": 9.0
        }))
        .unwrap();
        assert_eq!(linear.coef, vec![0.5, 0.25]);
        assert_eq!(linear.intercept, vec![9.0]);
        assert!(linear.scaler.is_none());

        let scaler: SkScaler =
            serde_json::from_value(json!({"mean_": [1.0], "scale_": [2.0]})).unwrap();
        assert_eq!(scaler.scale, vec![2.0]);
    }

    #[test]
    fn poly_defaults() {
        let poly: SkPoly = serde_json::from_value(json!({"n_features_in_": 8, "degree": 2})).unwrap();
        assert!(poly.include_bias);
        assert!(!poly.interaction_only);
        assert!(poly.powers.is_none());
    }
}

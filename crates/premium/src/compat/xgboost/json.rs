//! XGBoost JSON model schema.
//!
//! Parses the JSON format written by `Booster.save_model("*.json")` (XGBoost
//! >= 1.0). Only the parts needed for single-output regression inference are
//! modelled; unknown fields are ignored.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};

// =============================================================================
// Custom deserializers for XGBoost-specific formats
// =============================================================================

/// `base_score` appears as a number, a string (`"0.5"`), a bracketed string
/// (`"[9.0906E+00]"`, XGBoost >= 2.0) or an array.
fn deserialize_base_score<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    let mut cur = Value::deserialize(deserializer)?;
    loop {
        match cur {
            Value::Number(n) => {
                return n
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| SerdeError::custom("invalid number"));
            }
            Value::String(s) => {
                if let Ok(f) = s.trim().parse::<f32>() {
                    return Ok(f);
                }
                let t = s.trim();
                if let Some(inner) = t.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
                    if let Ok(f) = inner.trim().parse::<f32>() {
                        return Ok(f);
                    }
                }
                match serde_json::from_str::<Vec<Value>>(&s) {
                    Ok(arr) => match arr.into_iter().next() {
                        Some(first) => cur = first,
                        None => return Err(SerdeError::custom("empty base_score array")),
                    },
                    Err(_) => {
                        return Err(SerdeError::custom(format!(
                            "cannot parse base_score from string: {s}"
                        )))
                    }
                }
            }
            Value::Array(arr) => match arr.into_iter().next() {
                Some(first) => cur = first,
                None => return Err(SerdeError::custom("empty base_score array")),
            },
            _ => {
                return Err(SerdeError::custom(
                    "base_score must be number, string, or array",
                ));
            }
        }
    }
}

fn deserialize_bool_any<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i != 0),
            (None, Some(f)) => Ok(f != 0.0),
            _ => Err(SerdeError::custom("invalid number for bool")),
        },
        Value::String(s) => {
            let t = s.trim();
            if t.eq_ignore_ascii_case("true") || t == "1" {
                Ok(true)
            } else if t.eq_ignore_ascii_case("false") || t == "0" {
                Ok(false)
            } else {
                Err(SerdeError::custom(format!("cannot parse bool from string: {s}")))
            }
        }
        _ => Err(SerdeError::custom("unsupported type for bool")),
    }
}

fn default_num_target() -> i64 {
    1
}

fn default_boost_from_average() -> bool {
    true
}

// =============================================================================
// Tree / model level definitions
// =============================================================================

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct TreeParam {
    #[serde_as(as = "DisplayFromStr")]
    pub num_nodes: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub size_leaf_vector: i64,
    #[serde_as(as = "DisplayFromStr")]
    pub num_feature: i64,
}

/// One regression tree, stored as parallel arrays indexed by node id.
///
/// Leaves have `left_children[i] == -1`; their value is `base_weights[i]`.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub tree_param: TreeParam,
    #[serde(default)]
    pub id: i32,
    pub base_weights: Vec<f32>,
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<i32>,
    pub split_conditions: Vec<f32>,
    /// 0 = numeric, 1 = categorical.
    #[serde(default)]
    pub split_type: Vec<i32>,
    pub default_left: Vec<i32>,
    #[serde(default)]
    pub categories_nodes: Vec<i32>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct GBTreeModelParam {
    #[serde_as(as = "DisplayFromStr")]
    pub num_trees: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pub num_parallel_tree: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelTrees {
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub tree_info: Vec<i32>,
    pub gbtree_model_param: GBTreeModelParam,
}

impl ModelTrees {
    /// Number of trees in this model.
    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

// =============================================================================
// Gradient booster variants (gbtree | gblinear | dart)
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct GbLinearModel {
    pub weights: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GBTreeDefinition {
    pub model: ModelTrees,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum GradientBooster {
    Gbtree {
        model: ModelTrees,
    },
    Gblinear {
        model: GbLinearModel,
    },
    Dart {
        gbtree: GBTreeDefinition,
        weight_drop: Vec<f32>,
    },
}

// =============================================================================
// Learner-level definitions
// =============================================================================

/// Training objective. Only the name matters for inference: it decides how
/// `base_score` maps to margin space.
#[derive(Debug, Clone, Deserialize)]
pub struct Objective {
    pub name: String,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct LearnerModelParam {
    #[serde(deserialize_with = "deserialize_base_score")]
    pub base_score: f32,
    #[serde(rename = "num_class")]
    #[serde_as(as = "DisplayFromStr")]
    pub n_class: i64,
    #[serde(rename = "num_feature")]
    #[serde_as(as = "DisplayFromStr")]
    pub n_features: i64,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default = "default_num_target")]
    pub num_target: i64,
    #[serde(deserialize_with = "deserialize_bool_any")]
    #[serde(default = "default_boost_from_average")]
    pub boost_from_average: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Learner {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub gradient_booster: GradientBooster,
    pub objective: Objective,
    pub learner_model_param: LearnerModelParam,
}

// =============================================================================
// Top-level XGBoost model
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct XgbModel {
    pub version: [u32; 3],
    pub learner: Learner,
}

impl XgbModel {
    /// Load a model from a JSON file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::compat::ArtifactError> {
        crate::compat::read_json(path)
    }

    /// Parse a model from a serde_json Value.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_score_parses_number_string_array_and_bracketed() {
        for raw in [json!(1.5), json!("1.5"), json!([1.5]), json!("[1.5E0]"), json!("[1.5E+00]")] {
            let v = json!({"base_score": raw, "num_class": "0", "num_feature": "8"});
            let p: LearnerModelParam = serde_json::from_value(v).unwrap();
            assert_eq!(p.base_score, 1.5);
            assert_eq!(p.n_features, 8);
            assert_eq!(p.num_target, 1);
        }

        let v = json!({"base_score": "abc", "num_class": "0", "num_feature": "8"});
        assert!(serde_json::from_value::<LearnerModelParam>(v).is_err());
    }

    #[test]
    fn boost_from_average_accepts_various_types() {
        for (raw, expected) in [
            (json!(true), true),
            (json!(1), true),
            (json!("1"), true),
            (json!("0"), false),
            (json!("false"), false),
        ] {
            let v = json!({"base_score": 0.5, "num_class": "0", "num_feature": "1", "boost_from_average": raw});
            let p: LearnerModelParam = serde_json::from_value(v).unwrap();
            assert_eq!(p.boost_from_average, expected);
        }
    }

    #[test]
    fn booster_variant_is_selected_by_name() {
        let v = json!({"name": "gblinear", "model": {"weights": [0.1, 0.2]}});
        let booster: GradientBooster = serde_json::from_value(v).unwrap();
        assert!(matches!(booster, GradientBooster::Gblinear { .. }));
    }
}

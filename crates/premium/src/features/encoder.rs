//! Drop-first one-hot encoding of the categorical fields.

use ndarray::Array1;

use crate::error::{PredictError, Result};

use super::InsuranceRecord;

/// Categorical fields in encoding order.
pub const CATEGORICAL_FIELDS: [&str; 3] = ["sex", "smoker", "region"];

/// Numeric fields, emitted before the encoded columns.
pub const NUMERIC_FIELDS: [&str; 3] = ["age", "bmi", "children"];

/// Reference rows the encoder is fitted on, as `(sex, smoker, region)`.
///
/// Together they cover every category of every field.
pub const REFERENCE_TABLE: [[&str; 3]; 4] = [
    ["male", "yes", "northeast"],
    ["female", "no", "southwest"],
    ["male", "no", "southeast"],
    ["female", "yes", "northwest"],
];

fn categorical_value(record: &InsuranceRecord, field: usize) -> &str {
    match field {
        0 => &record.sex,
        1 => &record.smoker,
        _ => &record.region,
    }
}

// =============================================================================
// OneHotEncoder
// =============================================================================

/// Fitted one-hot encoder that drops the first (sorted) category per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneHotEncoder {
    /// Sorted categories per field, dropped category included.
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Fit on rows of categorical values, one column per field.
    pub fn fit<R, S>(rows: &[R]) -> Self
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let n_fields = rows.first().map_or(0, |r| r.as_ref().len());
        let categories = (0..n_fields)
            .map(|field| {
                let mut seen: Vec<String> = rows
                    .iter()
                    .filter_map(|r| r.as_ref().get(field))
                    .map(|v| v.as_ref().to_string())
                    .collect();
                seen.sort();
                seen.dedup();
                seen
            })
            .collect();
        Self { categories }
    }

    pub fn n_fields(&self) -> usize {
        self.categories.len()
    }

    /// Number of output columns: `Σ (k_i - 1)`.
    pub fn n_outputs(&self) -> usize {
        self.categories
            .iter()
            .map(|c| c.len().saturating_sub(1))
            .sum()
    }

    pub fn categories(&self, field: usize) -> &[String] {
        &self.categories[field]
    }

    /// Encode one value of `field` into its `k - 1` indicator columns.
    ///
    /// Returns `None` for a category not seen during fit.
    pub fn encode_value(&self, field: usize, value: &str, out: &mut Vec<f64>) -> Option<()> {
        let categories = &self.categories[field];
        let position = categories.iter().position(|c| c == value)?;
        out.extend((1..categories.len()).map(|i| if i == position { 1.0 } else { 0.0 }));
        Some(())
    }

    /// `<field>_<category>` for every output column.
    pub fn feature_names(&self, fields: &[&str]) -> Vec<String> {
        self.categories
            .iter()
            .zip(fields)
            .flat_map(|(categories, field)| {
                categories
                    .iter()
                    .skip(1)
                    .map(move |category| format!("{field}_{category}"))
            })
            .collect()
    }
}

// =============================================================================
// FeatureEncoder
// =============================================================================

/// Builds the model feature vector from a record.
///
/// Layout: `age, bmi, children`, then the one-hot columns of `sex`, `smoker`
/// and `region`, i.e.
/// `[age, bmi, children, sex_male, smoker_yes, region_northwest,
/// region_southeast, region_southwest]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEncoder {
    one_hot: OneHotEncoder,
}

impl FeatureEncoder {
    /// Fit on [`REFERENCE_TABLE`].
    pub fn fit_reference() -> Self {
        Self {
            one_hot: OneHotEncoder::fit(&REFERENCE_TABLE),
        }
    }

    /// Total width of the assembled vector.
    pub fn n_features(&self) -> usize {
        NUMERIC_FIELDS.len() + self.one_hot.n_outputs()
    }

    /// Column names in vector order.
    pub fn feature_names(&self) -> Vec<String> {
        NUMERIC_FIELDS
            .iter()
            .map(|f| f.to_string())
            .chain(self.one_hot.feature_names(&CATEGORICAL_FIELDS))
            .collect()
    }

    /// One-hot columns for the categorical fields of `record`.
    pub fn transform(&self, record: &InsuranceRecord) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.one_hot.n_outputs());
        for (field, name) in CATEGORICAL_FIELDS.iter().enumerate() {
            let value = categorical_value(record, field);
            self.one_hot
                .encode_value(field, value, &mut out)
                .ok_or_else(|| PredictError::Encoding {
                    field: name.to_string(),
                    value: value.to_string(),
                })?;
        }
        Ok(out)
    }

    /// Full feature vector: numeric fields followed by [`transform`](Self::transform).
    pub fn assemble(&self, record: &InsuranceRecord) -> Result<Array1<f64>> {
        let mut features = Vec::with_capacity(self.n_features());
        features.extend([record.age as f64, record.bmi, record.children as f64]);
        features.extend(self.transform(record)?);
        Ok(Array1::from(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rstest::rstest;

    fn record(sex: &str, smoker: &str, region: &str) -> InsuranceRecord {
        InsuranceRecord {
            age: 40,
            sex: sex.into(),
            bmi: 27.5,
            children: 2,
            smoker: smoker.into(),
            region: region.into(),
        }
    }

    #[test]
    fn reference_fit_sorts_categories() {
        let encoder = OneHotEncoder::fit(&REFERENCE_TABLE);
        assert_eq!(encoder.n_fields(), 3);
        assert_eq!(encoder.categories(0), ["female", "male"]);
        assert_eq!(encoder.categories(1), ["no", "yes"]);
        assert_eq!(
            encoder.categories(2),
            ["northeast", "northwest", "southeast", "southwest"]
        );
        assert_eq!(encoder.n_outputs(), 5);
    }

    #[test]
    fn feature_names_in_vector_order() {
        let encoder = FeatureEncoder::fit_reference();
        assert_eq!(encoder.n_features(), 8);
        assert_eq!(
            encoder.feature_names(),
            [
                "age",
                "bmi",
                "children",
                "sex_male",
                "smoker_yes",
                "region_northwest",
                "region_southeast",
                "region_southwest"
            ]
        );
    }

    #[rstest]
    #[case("female", "no", "northeast", [0.0, 0.0, 0.0, 0.0, 0.0])]
    #[case("male", "no", "northeast", [1.0, 0.0, 0.0, 0.0, 0.0])]
    #[case("female", "yes", "northwest", [0.0, 1.0, 1.0, 0.0, 0.0])]
    #[case("male", "yes", "southeast", [1.0, 1.0, 0.0, 1.0, 0.0])]
    #[case("female", "no", "southwest", [0.0, 0.0, 0.0, 0.0, 1.0])]
    fn drop_first_columns(
        #[case] sex: &str,
        #[case] smoker: &str,
        #[case] region: &str,
        #[case] expected: [f64; 5],
    ) {
        let encoder = FeatureEncoder::fit_reference();
        assert_eq!(encoder.transform(&record(sex, smoker, region)).unwrap(), expected);
    }

    #[test]
    fn assemble_prepends_numeric_fields() {
        let encoder = FeatureEncoder::fit_reference();
        let features = encoder.assemble(&record("male", "no", "northeast")).unwrap();
        assert_eq!(features, array![40.0, 27.5, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = FeatureEncoder::fit_reference();
        let b = FeatureEncoder::fit_reference();
        assert_eq!(a, b);

        let r = record("female", "yes", "southwest");
        assert_eq!(a.assemble(&r).unwrap(), b.assemble(&r).unwrap());
    }

    #[test]
    fn unseen_category_fails() {
        let encoder = FeatureEncoder::fit_reference();
        let err = encoder.transform(&record("male", "sometimes", "northeast")).unwrap_err();
        assert_eq!(
            err,
            PredictError::Encoding {
                field: "smoker".into(),
                value: "sometimes".into()
            }
        );
        assert!(!err.is_client_error());
    }
}

//! The raw applicant record.

use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};

/// Accepted ranges of the numeric fields.
pub const AGE_RANGE: (i64, i64) = (18, 100);
pub const BMI_RANGE: (f64, f64) = (10.0, 50.0);
pub const CHILDREN_RANGE: (i64, i64) = (0, 10);

pub const SEX_VALUES: [&str; 2] = ["male", "female"];
pub const SMOKER_VALUES: [&str; 2] = ["yes", "no"];
pub const REGION_VALUES: [&str; 4] = ["northeast", "northwest", "southeast", "southwest"];

/// One applicant, as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRecord {
    pub age: i64,
    pub sex: String,
    pub bmi: f64,
    pub children: i64,
    pub smoker: String,
    pub region: String,
}

impl InsuranceRecord {
    /// Copy with the categorical fields lower-cased.
    pub fn normalized(&self) -> Self {
        Self {
            sex: self.sex.to_lowercase(),
            smoker: self.smoker.to_lowercase(),
            region: self.region.to_lowercase(),
            ..self.clone()
        }
    }

    /// Check every field against its domain. Expects a normalized record.
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = AGE_RANGE;
        if !(lo..=hi).contains(&self.age) {
            return Err(PredictError::validation(
                "age",
                format!("{} is outside {lo}..={hi}", self.age),
            ));
        }

        let (lo, hi) = BMI_RANGE;
        if !self.bmi.is_finite() || !(lo..=hi).contains(&self.bmi) {
            return Err(PredictError::validation(
                "bmi",
                format!("{} is outside {lo}..={hi}", self.bmi),
            ));
        }

        let (lo, hi) = CHILDREN_RANGE;
        if !(lo..=hi).contains(&self.children) {
            return Err(PredictError::validation(
                "children",
                format!("{} is outside {lo}..={hi}", self.children),
            ));
        }

        check_one_of("sex", &self.sex, &SEX_VALUES)?;
        check_one_of("smoker", &self.smoker, &SMOKER_VALUES)?;
        check_one_of("region", &self.region, &REGION_VALUES)?;
        Ok(())
    }
}

fn check_one_of(field: &'static str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(PredictError::validation(
            field,
            format!("'{value}' is not one of {}", allowed.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn record() -> InsuranceRecord {
        InsuranceRecord {
            age: 40,
            sex: "Male".into(),
            bmi: 27.5,
            children: 2,
            smoker: "NO".into(),
            region: "NorthEast".into(),
        }
    }

    #[test]
    fn normalized_lowercases_categories_only() {
        let r = record().normalized();
        assert_eq!(r.sex, "male");
        assert_eq!(r.smoker, "no");
        assert_eq!(r.region, "northeast");
        assert_eq!(r.age, 40);
        assert!(r.validate().is_ok());
    }

    #[rstest]
    #[case(18, 10.0, 0)]
    #[case(100, 50.0, 10)]
    #[case(64, 29.97, 3)]
    fn boundaries_are_inclusive(#[case] age: i64, #[case] bmi: f64, #[case] children: i64) {
        let r = InsuranceRecord {
            age,
            bmi,
            children,
            ..record().normalized()
        };
        assert!(r.validate().is_ok());
    }

    #[rstest]
    #[case::too_young(17, 27.5, 2, "age")]
    #[case::too_old(101, 27.5, 2, "age")]
    #[case::bmi_low(40, 9.99, 2, "bmi")]
    #[case::bmi_high(40, 50.01, 2, "bmi")]
    #[case::bmi_nan(40, f64::NAN, 2, "bmi")]
    #[case::negative_children(40, 27.5, -1, "children")]
    #[case::many_children(40, 27.5, 11, "children")]
    fn out_of_range_numbers(
        #[case] age: i64,
        #[case] bmi: f64,
        #[case] children: i64,
        #[case] field: &str,
    ) {
        let r = InsuranceRecord {
            age,
            bmi,
            children,
            ..record().normalized()
        };
        match r.validate() {
            Err(PredictError::Validation { field: f, .. }) => assert_eq!(f, field),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let r = InsuranceRecord {
            region: "central".into(),
            ..record().normalized()
        };
        let err = r.validate().unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("central"));
    }
}

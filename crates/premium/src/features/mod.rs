//! Raw records and their numeric encoding.

mod encoder;
mod record;

pub use encoder::{
    FeatureEncoder, OneHotEncoder, CATEGORICAL_FIELDS, NUMERIC_FIELDS, REFERENCE_TABLE,
};
pub use record::{
    InsuranceRecord, AGE_RANGE, BMI_RANGE, CHILDREN_RANGE, REGION_VALUES, SEX_VALUES,
    SMOKER_VALUES,
};

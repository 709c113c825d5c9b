//! Linear regression model (weights + intercept).

use ndarray::{Array1, ArrayView1};

/// Single-output linear model.
///
/// ```text
/// prediction = features · weights + intercept
/// ```
///
/// # Example
///
/// ```
/// use premium::repr::LinearModel;
/// use ndarray::array;
///
/// let model = LinearModel::new(array![0.5, -1.0], 2.0);
/// assert_eq!(model.predict_row(array![2.0, 1.0].view()), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    weights: Array1<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(weights: Array1<f64>, intercept: f64) -> Self {
        Self { weights, intercept }
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    #[inline]
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Predict one row.
    ///
    /// # Panics
    ///
    /// Panics if `features.len() != self.n_features()`; callers check widths
    /// when the model is loaded.
    #[inline]
    pub fn predict_row(&self, features: ArrayView1<'_, f64>) -> f64 {
        features.dot(&self.weights) + self.intercept
    }
}

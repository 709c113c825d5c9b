//! Fitted feature transforms applied before linear inference.
//!
//! - [`StandardScaler`]: `z = (x - mean) / scale`
//! - [`PolynomialFeatures`]: monomials of the inputs up to a degree
//!
//! Both follow scikit-learn's conventions (population standard deviation,
//! unit scale for constant columns, combination ordering of monomials) so that
//! artifacts fitted there transform identically here.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Errors raised by fitted transforms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error("{what}: expected {expected} features, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("cannot fit a scaler on zero rows")]
    EmptyInput,
    #[error("scale for feature {index} must be finite and non-zero")]
    InvalidScale { index: usize },
}

// =============================================================================
// StandardScaler
// =============================================================================

/// Standardises features to zero mean and unit variance.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Build a scaler from statistics captured at training time.
    pub fn from_parts(mean: Array1<f64>, scale: Array1<f64>) -> Result<Self, TransformError> {
        if mean.len() != scale.len() {
            return Err(TransformError::DimensionMismatch {
                what: "scaler scale",
                expected: mean.len(),
                actual: scale.len(),
            });
        }
        if let Some(index) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(TransformError::InvalidScale { index });
        }
        Ok(Self { mean, scale })
    }

    /// Fit mean and population standard deviation per column.
    ///
    /// Columns with (near) zero variance get a scale of 1, so they are only
    /// centred. In particular, fitting on a single row maps that row to zeros.
    pub fn fit(rows: ArrayView2<'_, f64>) -> Result<Self, TransformError> {
        let n_rows = rows.nrows();
        if n_rows == 0 {
            return Err(TransformError::EmptyInput);
        }

        let mean = rows.sum_axis(Axis(0)) / n_rows as f64;
        let scale = rows
            .axis_iter(Axis(1))
            .zip(mean.iter())
            .map(|(column, &m)| {
                let var = column.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / n_rows as f64;
                let std = var.sqrt();
                if std < 10.0 * f64::EPSILON {
                    1.0
                } else {
                    std
                }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> ArrayView1<'_, f64> {
        self.mean.view()
    }

    pub fn scale(&self) -> ArrayView1<'_, f64> {
        self.scale.view()
    }

    /// Standardise one row.
    pub fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, TransformError> {
        if row.len() != self.n_features() {
            return Err(TransformError::DimensionMismatch {
                what: "standard scaler",
                expected: self.n_features(),
                actual: row.len(),
            });
        }
        Ok((&row - &self.mean) / &self.scale)
    }
}

// =============================================================================
// PolynomialFeatures
// =============================================================================

/// Polynomial feature expansion described by an exponent matrix.
///
/// `powers[[i, j]]` is the exponent of input `j` in output `i`, so output `i`
/// is `Π_j x_j ^ powers[[i, j]]`. A zero row is the bias column.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFeatures {
    powers: Array2<u32>,
}

impl PolynomialFeatures {
    /// Wrap an explicit `(n_outputs, n_inputs)` exponent matrix.
    pub fn from_powers(powers: Array2<u32>) -> Self {
        Self { powers }
    }

    /// Generate all monomials up to `degree`, in scikit-learn's output order.
    ///
    /// Terms are grouped by total degree, ascending, and within a degree
    /// ordered lexicographically by the (sorted) input indices they multiply.
    pub fn from_degree(
        n_inputs: usize,
        degree: u32,
        include_bias: bool,
        interaction_only: bool,
    ) -> Self {
        let start = if include_bias { 0 } else { 1 };
        let mut rows: Vec<Vec<u32>> = Vec::new();

        for d in start..=degree as usize {
            let mut combo = Vec::with_capacity(d);
            push_combinations(n_inputs, d, 0, interaction_only, &mut combo, &mut |indices: &[usize]| {
                let mut row = vec![0u32; n_inputs];
                for &i in indices {
                    row[i] += 1;
                }
                rows.push(row);
            });
        }

        let n_outputs = rows.len();
        let flat: Vec<u32> = rows.into_iter().flatten().collect();
        let powers = Array2::from_shape_vec((n_outputs, n_inputs), flat)
            .expect("every generated row has n_inputs entries");
        Self { powers }
    }

    #[inline]
    pub fn n_inputs(&self) -> usize {
        self.powers.ncols()
    }

    #[inline]
    pub fn n_outputs(&self) -> usize {
        self.powers.nrows()
    }

    pub fn powers(&self) -> ArrayView2<'_, u32> {
        self.powers.view()
    }

    /// Expand one row.
    pub fn transform(&self, row: ArrayView1<'_, f64>) -> Result<Array1<f64>, TransformError> {
        if row.len() != self.n_inputs() {
            return Err(TransformError::DimensionMismatch {
                what: "polynomial features",
                expected: self.n_inputs(),
                actual: row.len(),
            });
        }

        Ok(self
            .powers
            .outer_iter()
            .map(|exponents| {
                exponents
                    .iter()
                    .zip(row.iter())
                    .filter(|&(&p, _)| p > 0)
                    .map(|(&p, &x)| x.powi(p as i32))
                    .product::<f64>()
            })
            .collect())
    }
}

/// Visit every non-decreasing (strictly increasing when `distinct`) index
/// sequence of length `remaining` drawn from `from..n`, in lexicographic order.
fn push_combinations(
    n: usize,
    remaining: usize,
    from: usize,
    distinct: bool,
    combo: &mut Vec<usize>,
    visit: &mut dyn FnMut(&[usize]),
) {
    if remaining == 0 {
        visit(combo);
        return;
    }
    for i in from..n {
        combo.push(i);
        let next = if distinct { i + 1 } else { i };
        push_combinations(n, remaining - 1, next, distinct, combo, visit);
        combo.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn scaler_transform_uses_training_statistics() {
        let scaler = StandardScaler::from_parts(array![10.0, 2.0], array![5.0, 0.5]).unwrap();
        let z = scaler.transform(array![20.0, 1.0].view()).unwrap();
        assert_abs_diff_eq!(z[0], 2.0);
        assert_abs_diff_eq!(z[1], -2.0);
    }

    #[test]
    fn scaler_fit_matches_population_std() {
        let rows = array![[1.0, 100.0], [2.0, 200.0], [3.0, 300.0], [4.0, 400.0]];
        let scaler = StandardScaler::fit(rows.view()).unwrap();
        assert_abs_diff_eq!(scaler.mean()[0], 2.5);
        assert_abs_diff_eq!(scaler.mean()[1], 250.0);
        assert_abs_diff_eq!(scaler.scale()[0], 1.25f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(scaler.scale()[1], 12500f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn scaler_fit_on_single_row_yields_zeros() {
        let row = array![[40.0, 27.5, 2.0, 1.0, 0.0, 0.0, 0.0, 0.0]];
        let scaler = StandardScaler::fit(row.view()).unwrap();
        assert!(scaler.scale().iter().all(|&s| s == 1.0));

        let z = scaler.transform(row.row(0)).unwrap();
        assert!(z.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn scaler_rejects_bad_inputs() {
        assert_eq!(
            StandardScaler::fit(Array2::<f64>::zeros((0, 3)).view()),
            Err(TransformError::EmptyInput)
        );
        assert_eq!(
            StandardScaler::from_parts(array![0.0, 0.0], array![1.0]),
            Err(TransformError::DimensionMismatch {
                what: "scaler scale",
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            StandardScaler::from_parts(array![0.0, 0.0], array![1.0, 0.0]),
            Err(TransformError::InvalidScale { index: 1 })
        );

        let scaler = StandardScaler::from_parts(array![0.0], array![1.0]).unwrap();
        assert!(scaler.transform(array![1.0, 2.0].view()).is_err());
    }

    #[test]
    fn degree_two_ordering() {
        let poly = PolynomialFeatures::from_degree(2, 2, true, false);
        // 1, a, b, a^2, ab, b^2
        assert_eq!(
            poly.powers(),
            array![[0u32, 0], [1, 0], [0, 1], [2, 0], [1, 1], [0, 2]]
        );

        let out = poly.transform(array![3.0, 5.0].view()).unwrap();
        assert_eq!(out, array![1.0, 3.0, 5.0, 9.0, 15.0, 25.0]);
    }

    #[test]
    fn interaction_only_skips_powers() {
        let poly = PolynomialFeatures::from_degree(3, 2, false, true);
        // a, b, c, ab, ac, bc
        assert_eq!(poly.n_outputs(), 6);
        let out = poly.transform(array![2.0, 3.0, 4.0].view()).unwrap();
        assert_eq!(out, array![2.0, 3.0, 4.0, 6.0, 8.0, 12.0]);
    }

    #[test]
    fn output_count_for_eight_inputs() {
        let poly = PolynomialFeatures::from_degree(8, 2, false, false);
        assert_eq!(poly.n_inputs(), 8);
        assert_eq!(poly.n_outputs(), 8 + 36);
    }

    #[test]
    fn zero_base_with_zero_power_is_one() {
        let poly = PolynomialFeatures::from_powers(array![[0u32, 0], [0, 2]]);
        let out = poly.transform(array![0.0, 0.0].view()).unwrap();
        assert_eq!(out, array![1.0, 0.0]);
    }
}

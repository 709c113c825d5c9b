//! Small numeric and formatting helpers.

/// Invert the `log(charge + 1)` training target.
#[inline]
pub fn inverse_log1p(raw: f64) -> f64 {
    raw.exp_m1()
}

/// Round half away from zero to `decimals` places.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Render an amount as `$12,345.67`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(1121.8739)]
    #[case(8938.19)]
    #[case(16884.924)]
    #[case(63770.42801)]
    fn log_target_round_trips(#[case] charge: f64) {
        assert_relative_eq!(inverse_log1p(charge.ln_1p()), charge, max_relative = 1e-12);
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_to(6538.404, 2), 6538.4);
        assert_eq!(round_to(6538.406, 2), 6538.41);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }

    #[rstest]
    #[case(0.0, "$0.00")]
    #[case(7.5, "$7.50")]
    #[case(999.999, "$1,000.00")]
    #[case(12345.67, "$12,345.67")]
    #[case(1407167.21, "$1,407,167.21")]
    #[case(-42.1, "-$42.10")]
    fn currency_formatting(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }
}

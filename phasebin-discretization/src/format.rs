//! Bin boundary formatting.

/// Formats a value with 18 fractional digits and a signed, two digit
/// exponent (`-3.333333333333333148e-01`).
pub(crate) fn format_scientific(value: f64) -> String {
    let formatted = format!("{value:.18e}");

    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(1.0), "1.000000000000000000e+00");
        assert_eq!(format_scientific(-1.0), "-1.000000000000000000e+00");
        assert_eq!(format_scientific(0.0), "0.000000000000000000e+00");
        assert_eq!(
            format_scientific(-1.0 / 3.0),
            "-3.333333333333333148e-01"
        );
        assert_eq!(format_scientific(2.5e10), "2.500000000000000000e+10");
        assert_eq!(format_scientific(1e100), "1.000000000000000016e+100");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(format_scientific(f64::INFINITY), "inf");
    }
}

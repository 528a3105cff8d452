//! Deterministic textual form of real-valued configuration parameters.

/// Formats a real number for an attribute value.
///
/// Plain decimal notation is used for moderate magnitudes and scientific
/// notation (`1e-5`) for very small or very large ones, so the same value
/// always yields the same text.
pub fn format_real(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if !(1e-4..1e16).contains(&magnitude) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::format_real;
    use proptest::prelude::*;

    #[test]
    fn formats_common_parameters() {
        assert_eq!(format_real(0.1), "0.1");
        assert_eq!(format_real(1e-4), "0.0001");
        assert_eq!(format_real(1e-5), "1e-5");
        assert_eq!(format_real(0.5), "0.5");
        assert_eq!(format_real(100.0), "100");
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(-2.5e-7), "-2.5e-7");
    }

    proptest! {
        #[test]
        fn formatted_values_parse_back(value in -1e6f64..1e6f64) {
            let text = format_real(value);
            let parsed: f64 = text.parse().unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}

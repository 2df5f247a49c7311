//! Number formatting shared by the codec and the parameter encoder.

/// Format a finite float so that it always carries a decimal point.
///
/// `3.0` renders as `3.0`, never `3`, so the backend reads it as a float.
/// Very large and very small magnitudes use an exponent with a fractional
/// mantissa (`1.0e16`, `2.5e-7`). Non-finite values render as `NaN`/`inf`.
pub fn format_float(value: f64) -> String {
    // Debug formatting of f64 round-trips but drops the mantissa's `.0`
    // once it switches to exponent form.
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{}.0e{}", mantissa, exponent)
        }
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(3.0), "3.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(-1.5), "-1.5");
    }

    #[test]
    fn test_exponent_keeps_decimal_point() {
        assert_eq!(format_float(1e16), "1.0e16");
        assert_eq!(format_float(-1e16), "-1.0e16");
        assert_eq!(format_float(1.5e16), "1.5e16");
        assert_eq!(format_float(1e-5), "1.0e-5");
        assert_eq!(format_float(2.5e-7), "2.5e-7");
        assert_eq!(format_float(1e15), "1000000000000000.0");
        assert_eq!(format_float(0.0001), "0.0001");
    }
}

//! Display rounding and unit labels
//!
//! Quantities are rounded for display with precision that scales inversely
//! with magnitude: lab-relevant hundredths on small amounts, whole numbers
//! once spurious precision would stop being weighable anyway.

/// Round a quantity for display
///
/// 0 stays 0; |n| >= 100 rounds to the nearest integer; 10 <= |n| < 100
/// keeps one decimal; everything smaller keeps two.
pub fn round_smart(n: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }
    let magnitude = n.abs();
    if magnitude >= 100.0 {
        n.round()
    } else if magnitude >= 10.0 {
        (n * 10.0).round() / 10.0
    } else {
        (n * 100.0).round() / 100.0
    }
}

/// Format a mass in grams, switching to milligrams below 1 g
///
/// Never emits a gram value under 1; "0.01 g" reads as "10 mg" instead.
pub fn grams_label(value: f64) -> String {
    if value >= 1.0 {
        format!("{} g", round_smart(value))
    } else {
        format!("{} mg", round_smart(value * 1000.0))
    }
}

/// Format a volume in milliliters
pub fn ml_label(value: f64) -> String {
    format!("{} mL", round_smart(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_smart_zero() {
        assert_eq!(round_smart(0.0), 0.0);
    }

    #[test]
    fn test_round_smart_large_values_to_integer() {
        assert_eq!(round_smart(100.0), 100.0);
        assert_eq!(round_smart(121.14), 121.0);
        assert_eq!(round_smart(999.5), 1000.0);
    }

    #[test]
    fn test_round_smart_mid_values_to_one_decimal() {
        assert_eq!(round_smart(12.34), 12.3);
        assert_eq!(round_smart(99.99), 100.0);
        assert_eq!(round_smart(10.0), 10.0);
    }

    #[test]
    fn test_round_smart_small_values_to_two_decimals() {
        assert_eq!(round_smart(1.255), 1.26);
        assert_eq!(round_smart(9.999), 10.0);
        assert_eq!(round_smart(0.014), 0.01);
    }

    #[test]
    fn test_round_smart_negative_magnitude() {
        assert_eq!(round_smart(-12.34), -12.3);
        assert_eq!(round_smart(-150.4), -150.0);
    }

    #[test]
    fn test_grams_label_at_boundary() {
        assert_eq!(grams_label(1.0), "1 g");
        assert_eq!(grams_label(0.999), "999 mg");
    }

    #[test]
    fn test_grams_label_values() {
        assert_eq!(grams_label(2.5), "2.5 g");
        assert_eq!(grams_label(121.14), "121 g");
        assert_eq!(grams_label(0.0145), "14.5 mg");
        assert_eq!(grams_label(0.0), "0 mg");
    }

    #[test]
    fn test_ml_label() {
        assert_eq!(ml_label(250.0), "250 mL");
        assert_eq!(ml_label(12.34), "12.3 mL");
    }
}

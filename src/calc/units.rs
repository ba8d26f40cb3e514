//! Measurement units for recipe components
//!
//! Components are specified in one of three units; mass units normalize to
//! grams before scaling, volume stays in milliliters.

use serde::{Deserialize, Serialize};

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;

/// Unit of a recipe component's amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    /// Mass in grams (solids, powders)
    #[serde(rename = "g")]
    Grams,
    /// Mass in milligrams (trace additives, antibiotics)
    #[serde(rename = "mg")]
    Milligrams,
    /// Volume in milliliters (stock solutions, glycerol)
    #[serde(rename = "mL")]
    Milliliters,
}

impl Unit {
    /// Canonical display/storage string for this unit
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Grams => "g",
            Unit::Milligrams => "mg",
            Unit::Milliliters => "mL",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(Unit::Grams),
            "mg" | "milligram" | "milligrams" => Some(Unit::Milligrams),
            "ml" | "milliliter" | "milliliters" => Some(Unit::Milliliters),
            _ => None,
        }
    }

    /// Whether this is a volume unit
    pub fn is_volume(&self) -> bool {
        matches!(self, Unit::Milliliters)
    }

    /// Convert an amount in this unit to grams
    ///
    /// Returns None for volume units; milliliters cannot become grams
    /// without a density.
    pub fn amount_in_grams(&self, amount: f64) -> Option<f64> {
        match self {
            Unit::Grams => Some(amount),
            Unit::Milligrams => Some(amount * G_PER_MG),
            Unit::Milliliters => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_canonical() {
        assert_eq!(Unit::from_str("g"), Some(Unit::Grams));
        assert_eq!(Unit::from_str("mg"), Some(Unit::Milligrams));
        assert_eq!(Unit::from_str("mL"), Some(Unit::Milliliters));
    }

    #[test]
    fn test_from_str_variants() {
        assert_eq!(Unit::from_str("Grams"), Some(Unit::Grams));
        assert_eq!(Unit::from_str(" ml "), Some(Unit::Milliliters));
        assert_eq!(Unit::from_str("kg"), None);
        assert_eq!(Unit::from_str(""), None);
    }

    #[test]
    fn test_round_trip_as_str() {
        for unit in [Unit::Grams, Unit::Milligrams, Unit::Milliliters] {
            assert_eq!(Unit::from_str(unit.as_str()), Some(unit));
        }
    }

    #[test]
    fn test_amount_in_grams() {
        assert_eq!(Unit::Grams.amount_in_grams(10.0), Some(10.0));
        assert_eq!(Unit::Milligrams.amount_in_grams(500.0), Some(0.5));
        assert_eq!(Unit::Milliliters.amount_in_grams(10.0), None);
    }
}

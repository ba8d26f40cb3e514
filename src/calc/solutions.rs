//! Solution-chemistry calculators
//!
//! Percent (w/v, v/v), molarity (from powder or from a stock), and C1V1=C2V2
//! stock dilution. All closed-form arithmetic; divide-by-zero cases are
//! defined to yield 0 rather than an error.

use serde::Serialize;

use super::format::{grams_label, ml_label, round_smart};

/// Percent concentration mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PercentMode {
    /// Grams of solute per 100 mL
    #[serde(rename = "w/v")]
    WeightPerVolume,
    /// Milliliters of solute per 100 mL
    #[serde(rename = "v/v")]
    VolumePerVolume,
}

impl PercentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PercentMode::WeightPerVolume => "w/v",
            PercentMode::VolumePerVolume => "v/v",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "w/v" | "wv" | "weight" => Some(PercentMode::WeightPerVolume),
            "v/v" | "vv" | "volume" => Some(PercentMode::VolumePerVolume),
            _ => None,
        }
    }
}

/// Molarity calculator mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MolarityMode {
    /// Weigh solid into solvent: g = M × MW × L
    FromPowder,
    /// Dilute a known-molarity stock: V1 = C2·V2 / C1
    FromStock,
}

impl MolarityMode {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "from_powder" | "frompowder" | "powder" => Some(MolarityMode::FromPowder),
            "from_stock" | "fromstock" | "stock" => Some(MolarityMode::FromStock),
            _ => None,
        }
    }
}

/// Result of a percent or molarity calculation
#[derive(Debug, Clone, Serialize)]
pub struct SolutionResult {
    /// Solute quantity: grams for mass results, mL for volume results
    pub quantity: f64,
    pub display: String,
    /// "Water/solvent to final volume" line
    pub solvent_line: String,
}

/// Result of a C1V1 = C2V2 stock dilution
#[derive(Debug, Clone, Serialize)]
pub struct DilutionResult {
    /// Stock volume to take, in mL
    pub v1: f64,
    /// Solvent to add, in mL; negative when the stock is weaker than the target
    pub add_solvent: f64,
    /// True when v1 exceeds the final volume, i.e. the dilution is impossible
    pub insufficient_stock: bool,
    pub take_display: String,
    pub add_display: String,
}

fn solvent_line(volume_ml: f64) -> String {
    format!("to final volume {} mL", round_smart(volume_ml))
}

/// Solute quantity for a percent solution of a given final volume
///
/// w/v yields grams, v/v yields milliliters; both are percent × volume /
/// 100. The solvent is implicit (fill to the final volume), never computed
/// as volume minus solute.
pub fn percent_solution(mode: PercentMode, percent: f64, volume_ml: f64) -> SolutionResult {
    let quantity = percent * volume_ml / 100.0;
    let display = match mode {
        PercentMode::WeightPerVolume => grams_label(quantity),
        PercentMode::VolumePerVolume => ml_label(quantity),
    };
    SolutionResult {
        quantity,
        display,
        solvent_line: solvent_line(volume_ml),
    }
}

/// Mass to weigh for a molar solution made from solid
///
/// g = M × MW × volume(L).
pub fn molarity_from_powder(molarity: f64, molecular_weight: f64, volume_ml: f64) -> SolutionResult {
    let grams = molarity * molecular_weight * (volume_ml / 1000.0);
    SolutionResult {
        quantity: grams,
        display: grams_label(grams),
        solvent_line: solvent_line(volume_ml),
    }
}

/// Stock volume to take for a molar solution diluted from a stock
///
/// V1 = C2·V2 / C1, guarded to 0 when either concentration is non-positive.
pub fn molarity_from_stock(
    desired_molarity: f64,
    stock_molarity: f64,
    final_volume_ml: f64,
) -> SolutionResult {
    let v1 = if desired_molarity > 0.0 && stock_molarity > 0.0 {
        desired_molarity * final_volume_ml / stock_molarity
    } else {
        0.0
    };
    SolutionResult {
        quantity: v1,
        display: ml_label(v1),
        solvent_line: solvent_line(final_volume_ml),
    }
}

/// Solve C1·V1 = C2·V2 for V1 and the solvent to add
///
/// Concentration units are labels only; any consistent pair (fold, mg/mL,
/// M, %) gives the same arithmetic. When the desired concentration exceeds
/// the stock, add_solvent goes negative and insufficient_stock flags it;
/// the value is reported as computed, not clamped.
pub fn dilution(
    stock_concentration: f64,
    desired_concentration: f64,
    final_volume_ml: f64,
) -> DilutionResult {
    let v1 = if stock_concentration > 0.0 && desired_concentration > 0.0 {
        desired_concentration * final_volume_ml / stock_concentration
    } else {
        0.0
    };
    let add_solvent = final_volume_ml - v1;

    DilutionResult {
        v1,
        add_solvent,
        insufficient_stock: v1 > final_volume_ml,
        take_display: ml_label(v1),
        add_display: ml_label(add_solvent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_wv_one_percent_of_liter() {
        let result = percent_solution(PercentMode::WeightPerVolume, 1.0, 1000.0);
        assert!((result.quantity - 10.0).abs() < 1e-9);
        assert_eq!(result.display, "10 g");
        assert_eq!(result.solvent_line, "to final volume 1000 mL");
    }

    #[test]
    fn test_percent_wv_fractional() {
        let result = percent_solution(PercentMode::WeightPerVolume, 0.8, 250.0);
        assert!((result.quantity - 2.0).abs() < 1e-9);
        assert_eq!(result.display, "2 g");
    }

    #[test]
    fn test_percent_vv_displays_ml() {
        let result = percent_solution(PercentMode::VolumePerVolume, 70.0, 500.0);
        assert!((result.quantity - 350.0).abs() < 1e-9);
        assert_eq!(result.display, "350 mL");
    }

    #[test]
    fn test_percent_sub_gram_switches_to_mg() {
        // 0.1% of 100 mL = 0.1 g
        let result = percent_solution(PercentMode::WeightPerVolume, 0.1, 100.0);
        assert_eq!(result.display, "100 mg");
    }

    #[test]
    fn test_molarity_from_powder_tris() {
        // 1 M Tris base (MW 121.14) in 1 L
        let result = molarity_from_powder(1.0, 121.14, 1000.0);
        assert!((result.quantity - 121.14).abs() < 1e-9);
        assert_eq!(result.display, "121 g");
        assert_eq!(result.solvent_line, "to final volume 1000 mL");
    }

    #[test]
    fn test_molarity_from_powder_small_volume() {
        // 0.5 M NaCl (MW 58.44) in 50 mL = 1.461 g
        let result = molarity_from_powder(0.5, 58.44, 50.0);
        assert!((result.quantity - 1.461).abs() < 1e-9);
        assert_eq!(result.display, "1.46 g");
    }

    #[test]
    fn test_molarity_from_stock() {
        // 1 M from a 10 M stock, 500 mL final
        let result = molarity_from_stock(1.0, 10.0, 500.0);
        assert!((result.quantity - 50.0).abs() < 1e-9);
        assert_eq!(result.display, "50 mL");
    }

    #[test]
    fn test_molarity_from_stock_zero_stock_guarded() {
        let result = molarity_from_stock(1.0, 0.0, 500.0);
        assert_eq!(result.quantity, 0.0);
        assert_eq!(result.display, "0 mL");
    }

    #[test]
    fn test_dilution_tenfold() {
        let result = dilution(10.0, 1.0, 1000.0);
        assert!((result.v1 - 100.0).abs() < 1e-9);
        assert!((result.add_solvent - 900.0).abs() < 1e-9);
        assert!(!result.insufficient_stock);
        assert_eq!(result.take_display, "100 mL");
        assert_eq!(result.add_display, "900 mL");
    }

    #[test]
    fn test_dilution_zero_concentrations_guarded() {
        let result = dilution(0.0, 1.0, 1000.0);
        assert_eq!(result.v1, 0.0);
        assert_eq!(result.add_solvent, 1000.0);

        let result = dilution(10.0, 0.0, 1000.0);
        assert_eq!(result.v1, 0.0);
    }

    #[test]
    fn test_dilution_desired_above_stock_flagged() {
        // Desired 20 from a 10 stock: would need 2000 mL of stock in 1000 mL
        let result = dilution(10.0, 20.0, 1000.0);
        assert!((result.v1 - 2000.0).abs() < 1e-9);
        assert!((result.add_solvent - -1000.0).abs() < 1e-9);
        assert!(result.insufficient_stock);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(PercentMode::from_str("w/v"), Some(PercentMode::WeightPerVolume));
        assert_eq!(PercentMode::from_str("V/V"), Some(PercentMode::VolumePerVolume));
        assert_eq!(PercentMode::from_str("m/m"), None);
        assert_eq!(MolarityMode::from_str("fromPowder"), Some(MolarityMode::FromPowder));
        assert_eq!(MolarityMode::from_str("from_stock"), Some(MolarityMode::FromStock));
        assert_eq!(MolarityMode::from_str("dilute"), None);
    }
}

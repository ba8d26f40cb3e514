//! Solution Calculator MCP Tools
//!
//! Standalone calculators that need no stored recipe: percent solutions,
//! molar solutions, and stock dilutions. Numeric inputs are clamped to
//! non-negative before the math runs.

use serde::Serialize;

use crate::calc::{self, MolarityMode, PercentMode};

/// Response for percent_solution
#[derive(Debug, Serialize)]
pub struct PercentSolutionResponse {
    pub mode: &'static str,
    pub percent: f64,
    pub volume_ml: f64,
    /// Solute quantity: grams for w/v, mL for v/v
    pub quantity: f64,
    pub display: String,
    pub solvent_line: String,
}

/// Response for molar_solution
#[derive(Debug, Serialize)]
pub struct MolarSolutionResponse {
    pub mode: MolarityMode,
    pub molarity: f64,
    pub volume_ml: f64,
    /// Grams to weigh (from_powder) or stock mL to take (from_stock)
    pub quantity: f64,
    pub display: String,
    pub solvent_line: String,
}

/// Response for stock_dilution
#[derive(Debug, Serialize)]
pub struct StockDilutionResponse {
    pub stock_concentration: f64,
    pub desired_concentration: f64,
    pub final_volume_ml: f64,
    pub stock_volume_ml: f64,
    pub add_solvent_ml: f64,
    pub insufficient_stock: bool,
    pub take_display: String,
    pub add_display: String,
}

/// Calculate solute for a percent (w/v or v/v) solution
pub fn percent_solution(
    mode: &str,
    percent: f64,
    volume_ml: f64,
) -> Result<PercentSolutionResponse, String> {
    let mode = PercentMode::from_str(mode)
        .ok_or_else(|| format!("Unknown percent mode '{}': expected w/v or v/v", mode))?;

    let percent = percent.max(0.0);
    let volume_ml = volume_ml.max(0.0);
    let result = calc::percent_solution(mode, percent, volume_ml);

    Ok(PercentSolutionResponse {
        mode: mode.as_str(),
        percent,
        volume_ml,
        quantity: result.quantity,
        display: result.display,
        solvent_line: result.solvent_line,
    })
}

/// Calculate a molar solution, from powder or from a stock
///
/// from_powder needs molecular_weight; from_stock needs stock_molarity.
pub fn molar_solution(
    mode: &str,
    molarity: f64,
    volume_ml: f64,
    molecular_weight: Option<f64>,
    stock_molarity: Option<f64>,
) -> Result<MolarSolutionResponse, String> {
    let mode = MolarityMode::from_str(mode)
        .ok_or_else(|| format!("Unknown molarity mode '{}': expected from_powder or from_stock", mode))?;

    let molarity = molarity.max(0.0);
    let volume_ml = volume_ml.max(0.0);

    let result = match mode {
        MolarityMode::FromPowder => {
            let mw = molecular_weight
                .ok_or_else(|| "molecular_weight is required for from_powder".to_string())?
                .max(0.0);
            calc::molarity_from_powder(molarity, mw, volume_ml)
        }
        MolarityMode::FromStock => {
            let stock = stock_molarity
                .ok_or_else(|| "stock_molarity is required for from_stock".to_string())?
                .max(0.0);
            calc::molarity_from_stock(molarity, stock, volume_ml)
        }
    };

    Ok(MolarSolutionResponse {
        mode,
        molarity,
        volume_ml,
        quantity: result.quantity,
        display: result.display,
        solvent_line: result.solvent_line,
    })
}

/// Solve C1V1 = C2V2 for the stock volume and solvent to add
pub fn stock_dilution(
    stock_concentration: f64,
    desired_concentration: f64,
    final_volume_ml: f64,
) -> Result<StockDilutionResponse, String> {
    let stock_concentration = stock_concentration.max(0.0);
    let desired_concentration = desired_concentration.max(0.0);
    let final_volume_ml = final_volume_ml.max(0.0);

    let result = calc::dilution(stock_concentration, desired_concentration, final_volume_ml);

    Ok(StockDilutionResponse {
        stock_concentration,
        desired_concentration,
        final_volume_ml,
        stock_volume_ml: result.v1,
        add_solvent_ml: result.add_solvent,
        insufficient_stock: result.insufficient_stock,
        take_display: result.take_display,
        add_display: result.add_display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_solution_wv() {
        let response = percent_solution("w/v", 1.0, 1000.0).unwrap();
        assert_eq!(response.mode, "w/v");
        assert!((response.quantity - 10.0).abs() < 1e-9);
        assert_eq!(response.display, "10 g");
    }

    #[test]
    fn test_percent_solution_rejects_bad_mode() {
        assert!(percent_solution("m/m", 1.0, 1000.0).is_err());
    }

    #[test]
    fn test_percent_solution_clamps_negative_inputs() {
        let response = percent_solution("w/v", -5.0, 1000.0).unwrap();
        assert_eq!(response.percent, 0.0);
        assert_eq!(response.quantity, 0.0);
    }

    #[test]
    fn test_molar_solution_from_powder() {
        let response = molar_solution("from_powder", 1.0, 1000.0, Some(121.14), None).unwrap();
        assert!((response.quantity - 121.14).abs() < 1e-9);
        assert_eq!(response.display, "121 g");
    }

    #[test]
    fn test_molar_solution_from_powder_requires_mw() {
        assert!(molar_solution("from_powder", 1.0, 1000.0, None, None).is_err());
    }

    #[test]
    fn test_molar_solution_from_stock() {
        let response = molar_solution("from_stock", 1.0, 500.0, None, Some(10.0)).unwrap();
        assert!((response.quantity - 50.0).abs() < 1e-9);
        assert_eq!(response.display, "50 mL");
    }

    #[test]
    fn test_molar_solution_from_stock_requires_stock() {
        assert!(molar_solution("from_stock", 1.0, 500.0, Some(58.44), None).is_err());
    }

    #[test]
    fn test_stock_dilution() {
        let response = stock_dilution(10.0, 1.0, 1000.0).unwrap();
        assert!((response.stock_volume_ml - 100.0).abs() < 1e-9);
        assert!((response.add_solvent_ml - 900.0).abs() < 1e-9);
        assert!(!response.insufficient_stock);
    }

    #[test]
    fn test_stock_dilution_flags_insufficient_stock() {
        let response = stock_dilution(2.0, 5.0, 100.0).unwrap();
        assert!(response.insufficient_stock);
        assert!(response.add_solvent_ml < 0.0);
    }
}

//! Recipe scaling engine
//!
//! Scales a recipe's component amounts linearly from its base volume to a
//! target volume. Mass components normalize to grams first; volume
//! components stay in milliliters. Scaling never mutates the recipe; it is
//! a pure function of (components, parameters).

use serde::Serialize;

use super::format::{grams_label, ml_label, round_smart};
use super::units::Unit;

/// Per-recipe scaling parameters
///
/// Ephemeral UI-side state, keyed to a recipe by the caller. Never stored
/// alongside the recipe itself.
#[derive(Debug, Clone, Copy)]
pub struct ScalingParameters {
    /// Target volume per container, in mL
    pub target_ml: f64,
    /// Number of identical containers to prepare
    pub replicates: i64,
    /// Whether to emit the "water to volume" line
    pub show_water: bool,
}

impl ScalingParameters {
    pub fn new(target_ml: f64, replicates: i64, show_water: bool) -> Self {
        Self {
            target_ml,
            replicates: replicates.max(1),
            show_water,
        }
    }

    /// Defaults for a recipe: scale to its own base volume, one container
    pub fn for_base_volume(base_volume_ml: f64) -> Self {
        Self::new(base_volume_ml, 1, true)
    }
}

/// A component amount as the scaling engine consumes it
#[derive(Debug, Clone)]
pub struct ComponentAmount {
    pub name: String,
    pub amount: f64,
    pub unit: Unit,
}

/// One scaled component with its display string
#[derive(Debug, Clone, Serialize)]
pub struct ScaledComponent {
    pub name: String,
    /// Per-container quantity: grams for mass components, mL for volume
    pub quantity: f64,
    pub display: String,
}

/// Result of scaling a recipe
#[derive(Debug, Clone, Serialize)]
pub struct ScaledRecipe {
    pub per_component: Vec<ScaledComponent>,
    /// "Water to final volume" line, when requested
    pub water_line: Option<String>,
    /// Total volume across all replicates, in mL
    pub total_ml: f64,
}

/// Scale a recipe's components to a target volume
///
/// A zero base volume yields a zero factor rather than an error, so all
/// quantities come back 0. Replicates annotate the display strings and the
/// total volume; per-container quantities are unaffected.
pub fn scale_recipe(
    base_volume_ml: f64,
    components: &[ComponentAmount],
    params: &ScalingParameters,
) -> ScaledRecipe {
    let factor = if base_volume_ml > 0.0 {
        params.target_ml / base_volume_ml
    } else {
        0.0
    };
    let replicates = params.replicates.max(1);

    let per_component = components
        .iter()
        .map(|c| {
            let (quantity, mut display) = match c.unit.amount_in_grams(c.amount) {
                Some(grams) => {
                    let scaled = grams * factor;
                    (scaled, grams_label(scaled))
                }
                None => {
                    let scaled = c.amount * factor;
                    (scaled, ml_label(scaled))
                }
            };
            if replicates > 1 {
                display = format!("{} × {}", display, replicates);
            }
            ScaledComponent {
                name: c.name.clone(),
                quantity,
                display,
            }
        })
        .collect();

    let water_line = if params.show_water {
        Some(format!(
            "to final volume {} mL (per container)",
            round_smart(params.target_ml)
        ))
    } else {
        None
    };

    ScaledRecipe {
        per_component,
        water_line,
        total_ml: params.target_ml * replicates as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lb_broth() -> Vec<ComponentAmount> {
        vec![
            ComponentAmount {
                name: "Tryptone".to_string(),
                amount: 10.0,
                unit: Unit::Grams,
            },
            ComponentAmount {
                name: "Yeast Extract".to_string(),
                amount: 5.0,
                unit: Unit::Grams,
            },
            ComponentAmount {
                name: "NaCl".to_string(),
                amount: 10.0,
                unit: Unit::Grams,
            },
        ]
    }

    #[test]
    fn test_lb_broth_scaled_to_quarter() {
        let params = ScalingParameters::new(250.0, 1, true);
        let scaled = scale_recipe(1000.0, &lb_broth(), &params);

        assert_eq!(scaled.per_component.len(), 3);
        assert!((scaled.per_component[0].quantity - 2.5).abs() < 1e-9);
        assert!((scaled.per_component[1].quantity - 1.25).abs() < 1e-9);
        assert!((scaled.per_component[2].quantity - 2.5).abs() < 1e-9);
        assert_eq!(scaled.per_component[0].display, "2.5 g");
        assert_eq!(scaled.per_component[1].display, "1.25 g");
        assert_eq!(
            scaled.water_line.as_deref(),
            Some("to final volume 250 mL (per container)")
        );
        assert_eq!(scaled.total_ml, 250.0);
    }

    #[test]
    fn test_scaling_to_base_volume_is_identity() {
        let components = lb_broth();
        let params = ScalingParameters::for_base_volume(1000.0);
        let scaled = scale_recipe(1000.0, &components, &params);

        for (c, s) in components.iter().zip(&scaled.per_component) {
            assert!((s.quantity - c.amount).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_target_zeroes_all_quantities() {
        let params = ScalingParameters::new(0.0, 1, true);
        let scaled = scale_recipe(1000.0, &lb_broth(), &params);
        for s in &scaled.per_component {
            assert_eq!(s.quantity, 0.0);
        }
    }

    #[test]
    fn test_zero_base_volume_yields_zero_factor() {
        let params = ScalingParameters::new(500.0, 1, false);
        let scaled = scale_recipe(0.0, &lb_broth(), &params);
        for s in &scaled.per_component {
            assert_eq!(s.quantity, 0.0);
        }
    }

    #[test]
    fn test_milligram_component_normalizes_to_grams() {
        let components = vec![ComponentAmount {
            name: "Ampicillin".to_string(),
            amount: 100.0,
            unit: Unit::Milligrams,
        }];
        let params = ScalingParameters::new(500.0, 1, false);
        let scaled = scale_recipe(1000.0, &components, &params);

        // 100 mg in 1000 mL -> 0.05 g in 500 mL, shown in mg
        assert!((scaled.per_component[0].quantity - 0.05).abs() < 1e-9);
        assert_eq!(scaled.per_component[0].display, "50 mg");
    }

    #[test]
    fn test_milliliter_component_stays_in_ml() {
        let components = vec![ComponentAmount {
            name: "Glycerol".to_string(),
            amount: 100.0,
            unit: Unit::Milliliters,
        }];
        let params = ScalingParameters::new(250.0, 1, false);
        let scaled = scale_recipe(1000.0, &components, &params);

        assert!((scaled.per_component[0].quantity - 25.0).abs() < 1e-9);
        assert_eq!(scaled.per_component[0].display, "25 mL");
    }

    #[test]
    fn test_replicates_annotate_display_not_quantity() {
        let params = ScalingParameters::new(250.0, 4, false);
        let scaled = scale_recipe(1000.0, &lb_broth(), &params);

        assert!((scaled.per_component[0].quantity - 2.5).abs() < 1e-9);
        assert_eq!(scaled.per_component[0].display, "2.5 g × 4");
        assert_eq!(scaled.total_ml, 1000.0);
    }

    #[test]
    fn test_replicates_below_one_clamped() {
        let params = ScalingParameters::new(250.0, 0, false);
        let scaled = scale_recipe(1000.0, &lb_broth(), &params);
        assert_eq!(scaled.total_ml, 250.0);
        assert_eq!(scaled.per_component[0].display, "2.5 g");
    }

    #[test]
    fn test_zero_amount_component_is_valid() {
        let components = vec![ComponentAmount {
            name: "Agar".to_string(),
            amount: 0.0,
            unit: Unit::Grams,
        }];
        let params = ScalingParameters::new(500.0, 1, false);
        let scaled = scale_recipe(1000.0, &components, &params);
        assert_eq!(scaled.per_component[0].quantity, 0.0);
        assert_eq!(scaled.per_component[0].display, "0 mg");
    }

    #[test]
    fn test_show_water_off_omits_line() {
        let params = ScalingParameters::new(250.0, 1, false);
        let scaled = scale_recipe(1000.0, &lb_broth(), &params);
        assert!(scaled.water_line.is_none());
    }

    #[test]
    fn test_scaling_is_idempotent() {
        let components = lb_broth();
        let params = ScalingParameters::new(330.0, 2, true);
        let a = scale_recipe(1000.0, &components, &params);
        let b = scale_recipe(1000.0, &components, &params);
        for (x, y) in a.per_component.iter().zip(&b.per_component) {
            assert_eq!(x.quantity, y.quantity);
            assert_eq!(x.display, y.display);
        }
        assert_eq!(a.water_line, b.water_line);
    }
}

//! Calculation module
//!
//! Pure recipe-scaling and solution-chemistry arithmetic. Nothing in here
//! touches the database or the MCP layer; callers pass plain values in and
//! get numeric results plus display strings back.

pub mod format;
pub mod scale;
pub mod solutions;
pub mod units;

pub use format::{grams_label, ml_label, round_smart};
pub use scale::{scale_recipe, ComponentAmount, ScaledComponent, ScaledRecipe, ScalingParameters};
pub use solutions::{
    dilution, molarity_from_powder, molarity_from_stock, percent_solution, DilutionResult,
    MolarityMode, PercentMode, SolutionResult,
};
pub use units::Unit;

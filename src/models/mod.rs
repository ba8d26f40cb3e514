//! Database models
//!
//! Each model owns its table access: row mapping, CRUD, and the queries the
//! tool layer needs.

pub mod component;
pub mod recipe;

pub use component::{Component, ComponentCreate, ComponentUpdate};
pub use recipe::{Recipe, RecipeCreate, RecipeUpdate};

//! Recipe MCP Tools
//!
//! Tools for managing recipes and their components, and for scaling a
//! recipe into a prep protocol.

use serde::Serialize;

use crate::calc::{self, ComponentAmount, ScalingParameters, Unit};
use crate::db::Database;
use crate::models::{
    Component, ComponentCreate, ComponentUpdate, Recipe, RecipeCreate, RecipeUpdate,
};

/// Response for create_recipe
#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub id: i64,
    pub name: String,
    pub base_volume_ml: f64,
    pub created_at: String,
}

/// One component line in a recipe detail
#[derive(Debug, Serialize)]
pub struct ComponentDetail {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    pub unit: &'static str,
}

/// Full recipe detail with components
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub base_volume_ml: f64,
    pub components: Vec<ComponentDetail>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub name: String,
    pub base_volume_ml: f64,
    pub component_count: usize,
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for successful update
#[derive(Debug, Serialize)]
pub struct RecipeUpdateSuccessResponse {
    pub success: bool,
    pub updated_at: String,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct RecipeDeleteSuccessResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Response for add/update component
#[derive(Debug, Serialize)]
pub struct ComponentResponse {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub amount: f64,
    pub unit: &'static str,
}

/// One scaled component line
#[derive(Debug, Serialize)]
pub struct ScaledLine {
    pub name: String,
    pub quantity: f64,
    pub display: String,
}

/// Response for scale_recipe
#[derive(Debug, Serialize)]
pub struct ScaleRecipeResponse {
    pub recipe_id: i64,
    pub name: String,
    pub base_volume_ml: f64,
    pub target_volume_ml: f64,
    pub replicates: i64,
    pub components: Vec<ScaledLine>,
    pub water_line: Option<String>,
    pub total_volume_ml: f64,
    /// Ready-to-paste protocol text
    pub protocol_text: String,
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a new recipe
pub fn create_recipe(db: &Database, data: RecipeCreate) -> Result<CreateRecipeResponse, String> {
    let name = data.name.trim();
    if name.is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }
    if data.base_volume_ml < 0.0 {
        return Err("base_volume_ml cannot be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::create(&conn, &data)
        .map_err(|e| format!("Failed to create recipe: {}", e))?;

    Ok(CreateRecipeResponse {
        id: recipe.id,
        name: recipe.name,
        base_volume_ml: recipe.base_volume_ml,
        created_at: recipe.created_at,
    })
}

/// Get a recipe with its components
pub fn get_recipe(db: &Database, id: i64) -> Result<Option<RecipeDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?;

    match recipe {
        Some(recipe) => {
            let components = Component::get_for_recipe(&conn, id)
                .map_err(|e| format!("Failed to get components: {}", e))?
                .into_iter()
                .map(|c| ComponentDetail {
                    id: c.id,
                    name: c.name,
                    amount: c.amount,
                    unit: c.unit.as_str(),
                })
                .collect();

            Ok(Some(RecipeDetail {
                id: recipe.id,
                name: recipe.name,
                base_volume_ml: recipe.base_volume_ml,
                components,
                notes: recipe.notes,
                created_at: recipe.created_at,
                updated_at: recipe.updated_at,
            }))
        }
        None => Ok(None),
    }
}

/// List recipes with optional name search
pub fn list_recipes(
    db: &Database,
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(&conn, query, limit, offset)
        .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let total = Recipe::count(&conn).map_err(|e| format!("Failed to count recipes: {}", e))?;

    let mut summaries = Vec::new();
    for recipe in recipes {
        let components = Component::get_for_recipe(&conn, recipe.id)
            .map_err(|e| format!("Failed to get components: {}", e))?;

        summaries.push(RecipeSummary {
            id: recipe.id,
            name: recipe.name,
            base_volume_ml: recipe.base_volume_ml,
            component_count: components.len(),
        });
    }

    Ok(ListRecipesResponse {
        recipes: summaries,
        total,
        limit,
        offset,
    })
}

/// Update a recipe's name, base volume, or notes
pub fn update_recipe(
    db: &Database,
    id: i64,
    data: RecipeUpdate,
) -> Result<Option<RecipeUpdateSuccessResponse>, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Recipe name cannot be empty".to_string());
        }
    }
    if let Some(base) = data.base_volume_ml {
        if base < 0.0 {
            return Err("base_volume_ml cannot be negative".to_string());
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Recipe::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update recipe: {}", e))?;

    Ok(updated.map(|recipe| RecipeUpdateSuccessResponse {
        success: true,
        updated_at: recipe.updated_at,
    }))
}

/// Delete a recipe and its components
pub fn delete_recipe(
    db: &Database,
    id: i64,
) -> Result<Option<RecipeDeleteSuccessResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Recipe::delete(&conn, id)
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;

    Ok(deleted.then_some(RecipeDeleteSuccessResponse {
        success: true,
        deleted_id: id,
    }))
}

/// Duplicate a recipe with all its components
pub fn duplicate_recipe(db: &Database, id: i64) -> Result<Option<CreateRecipeResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let copy = Recipe::duplicate(&conn, id)
        .map_err(|e| format!("Failed to duplicate recipe: {}", e))?;

    Ok(copy.map(|recipe| CreateRecipeResponse {
        id: recipe.id,
        name: recipe.name,
        base_volume_ml: recipe.base_volume_ml,
        created_at: recipe.created_at,
    }))
}

// ============================================================================
// Component Tools
// ============================================================================

/// Add a component to a recipe
pub fn add_component(
    db: &Database,
    recipe_id: i64,
    name: &str,
    amount: f64,
    unit: &str,
) -> Result<ComponentResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Component name cannot be empty".to_string());
    }
    let unit = Unit::from_str(unit).ok_or_else(|| {
        format!("Unknown unit '{}': expected g, mg, or mL", unit)
    })?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Recipe::get_by_id(&conn, recipe_id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?
        .is_none()
    {
        return Err(format!("Recipe {} not found", recipe_id));
    }

    let component = Component::create(
        &conn,
        &ComponentCreate {
            recipe_id,
            name: name.to_string(),
            amount: amount.max(0.0),
            unit,
        },
    )
    .map_err(|e| format!("Failed to add component: {}", e))?;

    Ok(ComponentResponse {
        id: component.id,
        recipe_id: component.recipe_id,
        name: component.name,
        amount: component.amount,
        unit: component.unit.as_str(),
    })
}

/// Update a component's name, amount, or unit
pub fn update_component(
    db: &Database,
    id: i64,
    name: Option<&str>,
    amount: Option<f64>,
    unit: Option<&str>,
) -> Result<Option<ComponentResponse>, String> {
    if let Some(name) = name {
        if name.trim().is_empty() {
            return Err("Component name cannot be empty".to_string());
        }
    }
    let unit = match unit {
        Some(u) => Some(Unit::from_str(u).ok_or_else(|| {
            format!("Unknown unit '{}': expected g, mg, or mL", u)
        })?),
        None => None,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Component::update(
        &conn,
        id,
        &ComponentUpdate {
            name: name.map(|n| n.trim().to_string()),
            amount: amount.map(|a| a.max(0.0)),
            unit,
        },
    )
    .map_err(|e| format!("Failed to update component: {}", e))?;

    Ok(updated.map(|component| ComponentResponse {
        id: component.id,
        recipe_id: component.recipe_id,
        name: component.name,
        amount: component.amount,
        unit: component.unit.as_str(),
    }))
}

/// Remove a component from its recipe
pub fn remove_component(db: &Database, id: i64) -> Result<bool, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Component::delete(&conn, id).map_err(|e| format!("Failed to remove component: {}", e))
}

// ============================================================================
// Scaling
// ============================================================================

/// Scale a recipe to a target volume and build a prep protocol
pub fn scale_recipe(
    db: &Database,
    id: i64,
    target_volume_ml: f64,
    replicates: i64,
    show_water: bool,
) -> Result<Option<ScaleRecipeResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = match Recipe::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?
    {
        Some(recipe) => recipe,
        None => return Ok(None),
    };

    let amounts: Vec<ComponentAmount> = Component::get_for_recipe(&conn, id)
        .map_err(|e| format!("Failed to get components: {}", e))?
        .into_iter()
        .map(|c| ComponentAmount {
            name: c.name,
            amount: c.amount,
            unit: c.unit,
        })
        .collect();

    let params = ScalingParameters::new(target_volume_ml.max(0.0), replicates, show_water);
    let scaled = calc::scale_recipe(recipe.base_volume_ml, &amounts, &params);

    let protocol_text = build_protocol_text(&recipe.name, &params, &scaled);

    Ok(Some(ScaleRecipeResponse {
        recipe_id: recipe.id,
        name: recipe.name,
        base_volume_ml: recipe.base_volume_ml,
        target_volume_ml: params.target_ml,
        replicates: params.replicates,
        components: scaled
            .per_component
            .iter()
            .map(|c| ScaledLine {
                name: c.name.clone(),
                quantity: c.quantity,
                display: c.display.clone(),
            })
            .collect(),
        water_line: scaled.water_line.clone(),
        total_volume_ml: scaled.total_ml,
        protocol_text,
    }))
}

/// Build the copy-paste protocol block for a scaled recipe
fn build_protocol_text(
    name: &str,
    params: &ScalingParameters,
    scaled: &calc::ScaledRecipe,
) -> String {
    let mut lines = Vec::new();

    let header = if params.replicates > 1 {
        format!(
            "{} - scaled for {} mL × {} = {} mL",
            name,
            calc::round_smart(params.target_ml),
            params.replicates,
            calc::round_smart(scaled.total_ml)
        )
    } else {
        format!("{} - scaled for {} mL", name, calc::round_smart(params.target_ml))
    };
    lines.push(header);

    for component in &scaled.per_component {
        lines.push(format!("• {}: {}", component.name, component.display));
    }

    if let Some(ref water) = scaled.water_line {
        lines.push(format!("• Water/solvent: {}", water));
    }

    lines.join("\n")
}

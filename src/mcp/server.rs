//! LMM MCP Server Implementation
//!
//! Implements the MCP server with all LMM tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{Recipe, RecipeCreate, RecipeUpdate};
use crate::tools::calculators;
use crate::tools::recipes;
use crate::tools::status::StatusTracker;

/// LMM MCP Service
#[derive(Clone)]
pub struct LmmService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<LmmService>,
}

impl LmmService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    /// Name of the recipe
    pub name: String,
    /// Volume the component amounts are specified for, in mL (default 1000)
    #[serde(default = "default_base_volume")]
    pub base_volume_ml: f64,
    /// Optional notes (sterilization, pH, storage)
    pub notes: Option<String>,
}

fn default_base_volume() -> f64 { 1000.0 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetRecipeParams {
    /// Recipe ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListRecipesParams {
    /// Search query for recipe name (optional)
    pub query: Option<String>,
    /// Maximum results (default 50, max 200)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    /// Offset for pagination (default 0)
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    /// Recipe ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New base volume in mL (optional)
    pub base_volume_ml: Option<f64>,
    /// New notes (optional)
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecipeParams {
    /// Recipe ID to delete
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DuplicateRecipeParams {
    /// Recipe ID to duplicate
    pub id: i64,
}

// ============================================================================
// Component Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddComponentParams {
    /// Recipe ID to add the component to
    pub recipe_id: i64,
    /// Substance name (e.g. "Tryptone", "NaCl")
    pub name: String,
    /// Amount at the recipe's base volume
    pub amount: f64,
    /// Unit: "g", "mg", or "mL"
    pub unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateComponentParams {
    /// Component ID to update
    pub id: i64,
    /// New name (optional)
    pub name: Option<String>,
    /// New amount (optional)
    pub amount: Option<f64>,
    /// New unit: "g", "mg", or "mL" (optional)
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveComponentParams {
    /// Component ID to remove
    pub id: i64,
}

// ============================================================================
// Scaling and Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ScaleRecipeParams {
    /// Recipe ID to scale
    pub id: i64,
    /// Target volume per container, in mL
    pub target_volume_ml: f64,
    /// Number of identical containers to prepare (default 1)
    #[serde(default = "default_replicates")]
    pub replicates: i64,
    /// Include the "water to final volume" line (default true)
    #[serde(default = "default_show_water")]
    pub show_water: bool,
}

fn default_replicates() -> i64 { 1 }
fn default_show_water() -> bool { true }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PercentSolutionParams {
    /// Mode: "w/v" (grams per 100 mL) or "v/v" (mL per 100 mL)
    pub mode: String,
    /// Concentration in percent
    pub percent: f64,
    /// Final volume in mL
    pub volume_ml: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MolarSolutionParams {
    /// Mode: "from_powder" (weigh solid) or "from_stock" (dilute a stock)
    pub mode: String,
    /// Desired molarity in mol/L
    pub molarity: f64,
    /// Final volume in mL
    pub volume_ml: f64,
    /// Molecular weight in g/mol (required for from_powder)
    pub molecular_weight: Option<f64>,
    /// Stock molarity in mol/L (required for from_stock)
    pub stock_molarity: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StockDilutionParams {
    /// Stock concentration C1 (any unit consistent with desired_concentration)
    pub stock_concentration: f64,
    /// Desired concentration C2
    pub desired_concentration: f64,
    /// Final volume V2 in mL
    pub final_volume_ml: f64,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LmmService {
    // --- Status ---

    #[tool(description = "Get the current status of the LMM service including build info, database status, and process information")]
    async fn lmm_status(&self) -> Result<CallToolResult, McpError> {
        let recipe_count = self
            .database
            .with_conn(|conn| Recipe::count(conn))
            .ok();

        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(recipe_count);
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for managing recipes and running lab calculations. Call this when starting a session or when unsure how to use the recipe and calculator tools.")]
    fn recipe_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::RECIPE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(RECIPE_INSTRUCTIONS)]))
    }

    // --- Recipes ---

    #[tool(description = "Create a new recipe (components added separately)")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeCreate { name: p.name, base_volume_ml: p.base_volume_ml, notes: p.notes };
        let result = recipes::create_recipe(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get full recipe details with its components")]
    fn get_recipe(&self, Parameters(p): Parameters<GetRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(recipe) => serde_json::to_string_pretty(&recipe),
            None => Ok(format!(r#"{{"error": "Recipe not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List recipes with optional name search and pagination")]
    fn list_recipes(&self, Parameters(p): Parameters<ListRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.database, p.query.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Update a recipe's name, base volume, or notes")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpdate { name: p.name, base_volume_ml: p.base_volume_ml, notes: p.notes };
        let result = recipes::update_recipe(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(success) => serde_json::to_string_pretty(&success),
            None => Ok(format!(r#"{{"error": "Recipe not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Delete a recipe and all its components")]
    fn delete_recipe(&self, Parameters(p): Parameters<DeleteRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(success) => serde_json::to_string_pretty(&success),
            None => Ok(format!(r#"{{"error": "Recipe not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Duplicate a recipe with all its components. The copy gets \" (copy)\" appended to its name. Use this to derive a variant without touching the original.")]
    fn duplicate_recipe(&self, Parameters(p): Parameters<DuplicateRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::duplicate_recipe(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(copy) => serde_json::to_string_pretty(&copy),
            None => Ok(format!(r#"{{"error": "Recipe not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Components ---

    #[tool(description = "Add a component to a recipe. Amounts are per the recipe's base volume; unit must be g, mg, or mL.")]
    fn add_component(&self, Parameters(p): Parameters<AddComponentParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::add_component(&self.database, p.recipe_id, &p.name, p.amount, &p.unit)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Update a component's name, amount, or unit")]
    fn update_component(&self, Parameters(p): Parameters<UpdateComponentParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::update_component(&self.database, p.id, p.name.as_deref(), p.amount, p.unit.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(component) => serde_json::to_string_pretty(&component),
            None => Ok(format!(r#"{{"error": "Component not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Remove a component from its recipe")]
    fn remove_component(&self, Parameters(p): Parameters<RemoveComponentParams>) -> Result<CallToolResult, McpError> {
        let removed = recipes::remove_component(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        let json = if removed {
            format!(r#"{{"success": true, "deleted_id": {}}}"#, p.id)
        } else {
            format!(r#"{{"error": "Component not found", "id": {}}}"#, p.id)
        };
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Scaling ---

    #[tool(description = "Scale a recipe to a target volume and number of containers. Returns per-container amounts with display strings, a water line, the total volume, and a ready-to-paste protocol_text block.")]
    fn scale_recipe(&self, Parameters(p): Parameters<ScaleRecipeParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::scale_recipe(&self.database, p.id, p.target_volume_ml, p.replicates, p.show_water)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = match result {
            Some(scaled) => serde_json::to_string_pretty(&scaled),
            None => Ok(format!(r#"{{"error": "Recipe not found", "id": {}}}"#, p.id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Calculators ---

    #[tool(description = "Calculate solute for a percent solution. w/v returns grams (e.g. 1% of 1000 mL = 10 g), v/v returns mL. Solvent is always fill-to-final-volume.")]
    fn percent_solution(&self, Parameters(p): Parameters<PercentSolutionParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::percent_solution(&p.mode, p.percent, p.volume_ml)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Calculate a molar solution. from_powder returns grams to weigh (M x MW x liters, needs molecular_weight); from_stock returns the stock volume to take (needs stock_molarity).")]
    fn molar_solution(&self, Parameters(p): Parameters<MolarSolutionParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::molar_solution(&p.mode, p.molarity, p.volume_ml, p.molecular_weight, p.stock_molarity)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Solve C1V1 = C2V2: how much stock to take and how much solvent to add for a dilution. Flags insufficient_stock when the desired concentration exceeds the stock.")]
    fn stock_dilution(&self, Parameters(p): Parameters<StockDilutionParams>) -> Result<CallToolResult, McpError> {
        let result = calculators::stock_dilution(p.stock_concentration, p.desired_concentration, p.final_volume_ml)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for LmmService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "lmm".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Lab Media Manager".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Lab Media Manager (LMM) - Media and solution recipes with scaling and lab calculators. \
                 IMPORTANT: Call recipe_instructions when starting a session. \
                 Recipes: create/get/list/update/delete/duplicate_recipe, add/update/remove_component. \
                 Scaling: scale_recipe (target volume + replicates, returns protocol_text). \
                 Calculators: percent_solution (w/v, v/v), molar_solution (from_powder, from_stock), \
                 stock_dilution (C1V1 = C2V2). \
                 Component units are g, mg, or mL; amounts are per the recipe's base volume."
                    .into(),
            ),
        }
    }
}

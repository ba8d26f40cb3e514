//! Component model
//!
//! One line of a recipe: a named substance, an amount, and its unit. Units
//! are stored as their canonical text ("g", "mg", "mL") and parsed back into
//! the Unit enum at the row boundary.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::calc::Unit;
use crate::db::DbResult;

/// A single component of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    /// Amount at the recipe's base volume, in this component's unit
    pub amount: f64,
    pub unit: Unit,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding a component to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCreate {
    pub recipe_id: i64,
    pub name: String,
    pub amount: f64,
    pub unit: Unit,
}

/// Data for updating a component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentUpdate {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub unit: Option<Unit>,
}

impl Component {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit_str: String = row.get("unit")?;
        let unit = Unit::from_str(&unit_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("unknown unit: {}", unit_str).into(),
            )
        })?;

        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            name: row.get("name")?,
            amount: row.get("amount")?,
            unit,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Add a component to a recipe
    pub fn create(conn: &Connection, data: &ComponentCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO components (recipe_id, name, amount, unit)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![data.recipe_id, data.name, data.amount, data.unit.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a component by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM components WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(component) => Ok(Some(component)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all components for a recipe, in insertion order
    pub fn get_for_recipe(conn: &Connection, recipe_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt =
            conn.prepare("SELECT * FROM components WHERE recipe_id = ?1 ORDER BY id")?;

        let components = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(components)
    }

    /// Update a component
    pub fn update(conn: &Connection, id: i64, data: &ComponentUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(amount) = data.amount {
            updates.push(format!("amount = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(amount));
        }
        if let Some(unit) = data.unit {
            updates.push(format!("unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit.as_str()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE components SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a component
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM components WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Get the recipe_id for a component
    pub fn get_recipe_id(conn: &Connection, id: i64) -> DbResult<Option<i64>> {
        let result: Result<i64, _> = conn.query_row(
            "SELECT recipe_id FROM components WHERE id = ?1",
            [id],
            |row| row.get(0),
        );
        match result {
            Ok(recipe_id) => Ok(Some(recipe_id)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{migrations, Database};
    use crate::models::{Recipe, RecipeCreate};

    fn db_with_recipe() -> (Database, i64) {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| migrations::run_migrations(conn)).unwrap();
        let recipe_id = {
            let conn = db.get_conn().unwrap();
            Recipe::create(
                &conn,
                &RecipeCreate {
                    name: "LB Broth".to_string(),
                    base_volume_ml: 1000.0,
                    notes: None,
                },
            )
            .unwrap()
            .id
        };
        (db, recipe_id)
    }

    #[test]
    fn test_create_round_trips_unit() {
        let (db, recipe_id) = db_with_recipe();
        let conn = db.get_conn().unwrap();

        let component = Component::create(
            &conn,
            &ComponentCreate {
                recipe_id,
                name: "Ampicillin".to_string(),
                amount: 100.0,
                unit: Unit::Milligrams,
            },
        )
        .unwrap();

        let fetched = Component::get_by_id(&conn, component.id).unwrap().unwrap();
        assert_eq!(fetched.unit, Unit::Milligrams);
        assert_eq!(fetched.amount, 100.0);
        assert_eq!(fetched.recipe_id, recipe_id);
    }

    #[test]
    fn test_get_for_recipe_preserves_order() {
        let (db, recipe_id) = db_with_recipe();
        let conn = db.get_conn().unwrap();

        for (name, amount) in [("Tryptone", 10.0), ("Yeast Extract", 5.0), ("NaCl", 10.0)] {
            Component::create(
                &conn,
                &ComponentCreate {
                    recipe_id,
                    name: name.to_string(),
                    amount,
                    unit: Unit::Grams,
                },
            )
            .unwrap();
        }

        let components = Component::get_for_recipe(&conn, recipe_id).unwrap();
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].name, "Tryptone");
        assert_eq!(components[2].name, "NaCl");
    }

    #[test]
    fn test_update_unit_and_amount() {
        let (db, recipe_id) = db_with_recipe();
        let conn = db.get_conn().unwrap();

        let component = Component::create(
            &conn,
            &ComponentCreate {
                recipe_id,
                name: "Glucose".to_string(),
                amount: 20.0,
                unit: Unit::Grams,
            },
        )
        .unwrap();

        let updated = Component::update(
            &conn,
            component.id,
            &ComponentUpdate {
                amount: Some(500.0),
                unit: Some(Unit::Milligrams),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.name, "Glucose");
        assert_eq!(updated.amount, 500.0);
        assert_eq!(updated.unit, Unit::Milligrams);
    }

    #[test]
    fn test_delete_and_missing() {
        let (db, recipe_id) = db_with_recipe();
        let conn = db.get_conn().unwrap();

        let component = Component::create(
            &conn,
            &ComponentCreate {
                recipe_id,
                name: "Agar".to_string(),
                amount: 15.0,
                unit: Unit::Grams,
            },
        )
        .unwrap();

        assert!(Component::delete(&conn, component.id).unwrap());
        assert!(Component::get_by_id(&conn, component.id).unwrap().is_none());
        assert!(!Component::delete(&conn, component.id).unwrap());
    }
}

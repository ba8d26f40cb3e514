//! Built-in recipe seeding
//!
//! Populates an empty database with the standard starter recipes so a fresh
//! install is immediately usable.

use rusqlite::{params, Connection};

use super::connection::DbResult;

struct SeedRecipe {
    name: &'static str,
    base_volume_ml: f64,
    notes: &'static str,
    components: &'static [(&'static str, f64, &'static str)],
}

const SEED_RECIPES: &[SeedRecipe] = &[
    SeedRecipe {
        name: "LB Broth (per 1000 mL)",
        base_volume_ml: 1000.0,
        notes: "Autoclave; optional Agar 15 g for LB Agar.",
        components: &[
            ("Tryptone", 10.0, "g"),
            ("Yeast Extract", 5.0, "g"),
            ("NaCl", 10.0, "g"),
        ],
    },
    SeedRecipe {
        name: "YPD Broth (per 1000 mL)",
        base_volume_ml: 1000.0,
        notes: "Autoclave 121°C 15 min.",
        components: &[
            ("Peptone", 20.0, "g"),
            ("Yeast Extract", 10.0, "g"),
            ("Dextrose (Glucose)", 20.0, "g"),
        ],
    },
    SeedRecipe {
        name: "PBS 10× (per 1000 mL)",
        base_volume_ml: 1000.0,
        notes: "Dilute 1:10 for 1×. Adjust pH ~7.4.",
        components: &[
            ("NaCl", 80.0, "g"),
            ("KCl", 2.0, "g"),
            ("Na2HPO4", 14.4, "g"),
            ("KH2PO4", 2.4, "g"),
        ],
    },
];

/// Insert the built-in recipes if the recipes table is empty
///
/// Returns the number of recipes inserted (0 when the library already has
/// any recipe, including user-created ones).
pub fn seed_builtin_recipes(conn: &Connection) -> DbResult<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(0);
    }

    for recipe in SEED_RECIPES {
        conn.execute(
            "INSERT INTO recipes (name, base_volume_ml, notes) VALUES (?1, ?2, ?3)",
            params![recipe.name, recipe.base_volume_ml, recipe.notes],
        )?;
        let recipe_id = conn.last_insert_rowid();

        for (name, amount, unit) in recipe.components {
            conn.execute(
                "INSERT INTO components (recipe_id, name, amount, unit) VALUES (?1, ?2, ?3, ?4)",
                params![recipe_id, name, amount, unit],
            )?;
        }
    }

    tracing::info!("seeded {} built-in recipes", SEED_RECIPES.len());
    Ok(SEED_RECIPES.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn fresh_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn test_seed_populates_three_recipes() {
        let conn = fresh_conn();
        assert_eq!(seed_builtin_recipes(&conn).unwrap(), 3);

        let recipes: i64 = conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(recipes, 3);

        let components: i64 = conn
            .query_row("SELECT COUNT(*) FROM components", [], |row| row.get(0))
            .unwrap();
        assert_eq!(components, 10);
    }

    #[test]
    fn test_seed_skips_non_empty_library() {
        let conn = fresh_conn();
        conn.execute("INSERT INTO recipes (name) VALUES ('My Medium')", [])
            .unwrap();
        assert_eq!(seed_builtin_recipes(&conn).unwrap(), 0);
    }

    #[test]
    fn test_seed_lb_broth_amounts() {
        let conn = fresh_conn();
        seed_builtin_recipes(&conn).unwrap();

        let tryptone: f64 = conn
            .query_row(
                "SELECT c.amount FROM components c
                 JOIN recipes r ON c.recipe_id = r.id
                 WHERE r.name LIKE 'LB Broth%' AND c.name = 'Tryptone'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tryptone, 10.0);
    }
}

//! Utility to print prep protocol sheets for every stored recipe
//!
//! Optional first argument is a target volume in mL; defaults to each
//! recipe's own base volume.

use std::path::PathBuf;

use chrono::Local;

use lmm::calc::{self, ComponentAmount, ScalingParameters};
use lmm::models::{Component, Recipe};

fn get_database_path() -> PathBuf {
    std::env::var("LMM_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            std::fs::create_dir_all(&path).ok();
            path.push("lmm.db");
            path
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let target_ml: Option<f64> = std::env::args().nth(1).and_then(|arg| arg.parse().ok());

    let db_path = get_database_path();
    println!("Database path: {}", db_path.display());

    let database = lmm::db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        lmm::db::migrations::run_migrations(conn)?;
        lmm::db::seed::seed_builtin_recipes(conn)?;
        Ok(())
    })?;

    database.with_conn(|conn| {
        let recipes = Recipe::list(conn, None, 200, 0)?;
        println!(
            "Protocol sheets generated {}",
            Local::now().format("%Y-%m-%d %H:%M")
        );
        println!("{} recipe(s)\n", recipes.len());

        for recipe in recipes {
            let amounts: Vec<ComponentAmount> = Component::get_for_recipe(conn, recipe.id)?
                .into_iter()
                .map(|c| ComponentAmount {
                    name: c.name,
                    amount: c.amount,
                    unit: c.unit,
                })
                .collect();

            let params = match target_ml {
                Some(target) => ScalingParameters::new(target, 1, true),
                None => ScalingParameters::for_base_volume(recipe.base_volume_ml),
            };
            let scaled = calc::scale_recipe(recipe.base_volume_ml, &amounts, &params);

            println!(
                "{} - scaled for {} mL",
                recipe.name,
                calc::round_smart(params.target_ml)
            );
            for component in &scaled.per_component {
                println!("  • {}: {}", component.name, component.display);
            }
            if let Some(ref water) = scaled.water_line {
                println!("  • Water/solvent: {}", water);
            }
            if let Some(ref notes) = recipe.notes {
                println!("  Notes: {}", notes);
            }
            println!();
        }

        Ok(())
    })?;

    Ok(())
}

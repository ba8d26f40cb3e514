//! LMM Status Tool
//!
//! Provides runtime status information about the LMM service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Recipe and calculator instructions for AI assistants
pub const RECIPE_INSTRUCTIONS: &str = r#"
# LMM Recipe and Calculator Instructions

This guide explains how to manage media/solution recipes and run lab
calculations using the Lab Media Manager (LMM) tools.

## Overview

LMM stores **recipes** (a named mixture defined at a base volume, usually
1000 mL) made of **components** (a substance, an amount, and a unit). The
scale tool turns any recipe into a prep protocol for a different volume
and number of containers. Three standalone calculators cover percent
solutions, molar solutions, and stock dilutions.

A fresh database ships with LB Broth, YPD Broth, and PBS 10× so scaling
can be demonstrated immediately.

## Units

Component amounts use exactly three units:

| Unit | Use for |
|------|---------|
| `g`  | Solids and powders (tryptone, NaCl, agar) |
| `mg` | Trace additives and antibiotics (ampicillin) |
| `mL` | Liquid stocks measured by volume (glycerol, Tris-HCl stock) |

Do NOT use kg, L, µg, or cups. Convert first and pick one of the three.
Amounts are interpreted per the recipe's `base_volume_ml`.

## Recipe Workflow

### Create a recipe and add components

```
create_recipe(name: "SOC Medium", base_volume_ml: 1000, notes: "Filter-sterilize glucose.")
add_component(recipe_id: 4, name: "Tryptone", amount: 20, unit: "g")
add_component(recipe_id: 4, name: "Yeast Extract", amount: 5, unit: "g")
add_component(recipe_id: 4, name: "NaCl", amount: 0.5, unit: "g")
```

### Scale a recipe

```
scale_recipe(id: 4, target_volume_ml: 250, replicates: 4)
```

Returns per-container amounts, a water line ("to final volume 250 mL
(per container)"), the total volume across containers, and a ready-to-paste
`protocol_text` block. Per-container amounts do not change with
replicates; only the display annotation ("× 4") and the total do.

Display rounding is automatic: sub-gram masses switch to mg, values
over 100 round to whole numbers.

### Duplicate before editing

`duplicate_recipe(id: 2)` clones a recipe and all its components with
" (copy)" appended to the name. Duplicate the built-ins rather than
editing them when a user wants a variant.

## Calculators

### Percent solution

```
percent_solution(mode: "w/v", percent: 0.8, volume_ml: 250)
```

w/v returns grams of solute (0.8% of 250 mL = 2 g); v/v returns mL.
The solvent is always "fill to final volume", never volume minus solute.

### Molar solution

From powder (needs molecular weight):
```
molar_solution(mode: "from_powder", molarity: 1, volume_ml: 1000, molecular_weight: 121.14)
```
Returns grams to weigh: M × MW × liters.

From a stock (needs stock molarity):
```
molar_solution(mode: "from_stock", molarity: 1, volume_ml: 500, stock_molarity: 10)
```
Returns the stock volume to take.

### Stock dilution (C1V1 = C2V2)

```
stock_dilution(stock_concentration: 10, desired_concentration: 1, final_volume_ml: 1000)
```

Concentration units just need to match each other (fold, mg/mL, M, %).
Returns the stock volume to take and the solvent to add. If the desired
concentration exceeds the stock, `insufficient_stock` is true and
`add_solvent_ml` is negative; tell the user the dilution is impossible
as specified.

## Quick Reference

| Task | Tool |
|------|------|
| Create recipe | `create_recipe` |
| View recipe with components | `get_recipe` |
| List/search recipes | `list_recipes` |
| Rename / change base volume | `update_recipe` |
| Delete recipe | `delete_recipe` |
| Clone recipe | `duplicate_recipe` |
| Add component | `add_component` |
| Edit component | `update_component` |
| Remove component | `remove_component` |
| Scale to a volume | `scale_recipe` |
| Percent solution | `percent_solution` |
| Molar solution | `molar_solution` |
| C1V1 = C2V2 | `stock_dilution` |

## Notes

- Negative amounts, volumes, and concentrations are treated as 0.
- Replicates below 1 are treated as 1.
- Deleting a recipe deletes its components (cascade).
- Built-in recipes are seeded only into an empty database; deleting
  them is permanent until the database file is removed.
"#;

/// Runtime status of the LMM service
#[derive(Debug, Clone, Serialize)]
pub struct LmmStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub recipe_count: Option<i64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, recipe_count: Option<i64>) -> LmmStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        LmmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            recipe_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

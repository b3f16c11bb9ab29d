use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{PlannerError, Result};
use crate::models::{IngredientIndex, Meal};
use crate::state::app::{AppState, CURRENT_SCHEMA_VERSION};

/// Planner fields that version 1 files kept under `ui`.
const V1_UI_FIELDS: [&str; 6] = [
    "plannerMeals",
    "plannerExtras",
    "plannerIngredientChecks",
    "plannerIngredientComments",
    "plannerSubstituteSelections",
    "plannerMealMultipliers",
];

/// Bring an older state document up to the current layout.
pub fn migrate(mut doc: Value) -> Value {
    let version = doc
        .get("schemaVersion")
        .and_then(Value::as_u64)
        .unwrap_or(1);

    if version >= 2 {
        return doc;
    }

    if let Some(obj) = doc.as_object_mut() {
        let mut data = Map::new();
        for key in ["userMeals", "userStores", "userCategories"] {
            let value = obj.remove(key).unwrap_or_else(|| Value::Array(Vec::new()));
            data.insert(key.to_string(), value);
        }
        // very old exports called the meal list "meals"
        if let Some(meals) = obj.remove("meals") {
            let no_user_meals = data
                .get("userMeals")
                .and_then(Value::as_array)
                .is_some_and(Vec::is_empty);
            if no_user_meals {
                data.insert("userMeals".to_string(), meals);
            }
        }

        let old_ui = obj.remove("ui").unwrap_or_else(|| Value::Object(Map::new()));
        let mut ui = Map::new();
        for field in V1_UI_FIELDS {
            if let Some(value) = old_ui.get(field).or_else(|| obj.get(field)) {
                ui.insert(field.to_string(), value.clone());
            }
        }
        for field in V1_UI_FIELDS {
            obj.remove(field);
        }

        obj.insert("data".to_string(), Value::Object(data));
        obj.insert("ui".to_string(), Value::Object(ui));
        obj.insert("schemaVersion".to_string(), Value::from(CURRENT_SCHEMA_VERSION));
    }

    doc
}

/// Load planner state from a JSON file.
///
/// A missing file yields a fresh, empty state.
pub fn load_state<P: AsRef<Path>>(path: P) -> Result<AppState> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "no state file, starting fresh");
        return Ok(AppState::default());
    }

    let content = fs::read_to_string(path)?;
    let doc: Value = serde_json::from_str(&content)?;
    let state: AppState = serde_json::from_value(migrate(doc))?;

    info!(
        path = %path.display(),
        meals = state.data.user_meals().len(),
        selected = state.ui.selected_meals.len(),
        "loaded planner state"
    );
    Ok(state)
}

/// Save planner state as pretty-printed JSON.
pub fn save_state<P: AsRef<Path>>(path: P, state: &AppState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path.as_ref(), json)?;
    info!(path = %path.as_ref().display(), "saved planner state");
    Ok(())
}

/// Load the reference ingredient index.
///
/// Any failure degrades to an empty index, which classifies every item as
/// "Other".
pub fn load_index<P: AsRef<Path>>(path: P) -> IngredientIndex {
    let path = path.as_ref();
    let parsed = fs::read_to_string(path)
        .map_err(PlannerError::from)
        .and_then(|content| Ok(serde_json::from_str::<IngredientIndex>(&content)?));

    match parsed {
        Ok(index) => {
            info!(path = %path.display(), entries = index.len(), "ingredient index loaded");
            index
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to load ingredient index, aisles will default to Other");
            IngredientIndex::new()
        }
    }
}

/// Load read-only starter meals from a JSON array.
pub fn load_starters<P: AsRef<Path>>(path: P) -> Result<Vec<Meal>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

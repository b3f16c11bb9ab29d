use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::grocery::{grocery_list_for, GroceryList, IndexMatcher};
use crate::models::{Ingredient, Meal};
use crate::state::{MealLibrary, PlannerSelection};

/// Version written by this crate. Version 1 files kept meals at the root.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Everything the planner persists: the meal library and the planner
/// selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(rename = "schemaVersion", default)]
    pub schema_version: u32,

    #[serde(default)]
    pub data: MealLibrary,

    #[serde(default)]
    pub ui: PlannerSelection,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            data: MealLibrary::default(),
            ui: PlannerSelection::default(),
        }
    }
}

impl AppState {
    pub fn new(library: MealLibrary, selection: PlannerSelection) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            data: library,
            ui: selection,
        }
    }

    /// Resolve a meal reference (id or name) to its id.
    pub fn meal_id(&self, query: &str) -> Result<String> {
        self.data
            .find_by_name(query)
            .map(|m| m.id.clone())
            .ok_or_else(|| PlannerError::MealNotFound(query.to_string()))
    }

    /// Resolve an ingredient reference (id or case-insensitive name) within
    /// one meal.
    pub fn ingredient_in<'a>(&self, meal: &'a Meal, query: &str) -> Result<&'a Ingredient> {
        let query = query.trim();
        meal.ingredient(query)
            .or_else(|| {
                meal.ingredients
                    .iter()
                    .find(|i| i.name.eq_ignore_ascii_case(query))
            })
            .ok_or_else(|| PlannerError::IngredientNotFound(query.to_string()))
    }

    /// Record a substitute choice after checking the ingredient really is a
    /// member of that group in that meal.
    pub fn choose_substitute(&mut self, meal_query: &str, group: &str, ingredient: &str) -> Result<()> {
        let meal_id = self.meal_id(meal_query)?;
        let meal = self
            .data
            .find(&meal_id)
            .ok_or_else(|| PlannerError::MealNotFound(meal_id.clone()))?;

        let ing = self.ingredient_in(meal, ingredient)?;
        if ing.group != group.trim() {
            return Err(PlannerError::InvalidInput(format!(
                "'{}' is not in substitute group '{}' of {}",
                ing.name, group, meal.name
            )));
        }

        let ing_id = ing.id.clone();
        self.ui.choose_substitute(&meal_id, group.trim(), &ing_id);
        Ok(())
    }

    /// Delete a user meal and every planner choice that referred to it.
    pub fn delete_meal(&mut self, meal_query: &str) -> Result<Meal> {
        let meal_id = self.meal_id(meal_query)?;
        let meal = self.data.delete_meal(&meal_id)?;
        if self.data.find(&meal_id).is_none() {
            self.ui.forget_meal(&meal_id);
        }
        Ok(meal)
    }

    /// Build the shopping list for the current selection.
    pub fn grocery_list(&self, matcher: &IndexMatcher) -> GroceryList {
        grocery_list_for(self.data.all_meals(), &self.ui, matcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let tacos = Meal::with_id(
            "tacos",
            "Tacos",
            "Low Prep",
            vec![
                Ingredient::new("Tortillas", 1.0, "CT", "Walmart"),
                Ingredient::new("Ground Beef", 1.0, "LB", "Walmart").in_group("protein", true),
                Ingredient::new("Chicken Breast", 1.0, "LB", "Walmart").in_group("protein", false),
            ],
        );
        AppState::new(MealLibrary::new(vec![tacos]), PlannerSelection::default())
    }

    #[test]
    fn test_choose_substitute_by_name() {
        let mut state = state();
        state.choose_substitute("tacos", "protein", "chicken breast").unwrap();

        let chosen = &state.ui.overrides_for("tacos").unwrap()["protein"];
        let (_, ing) = state.data.find_ingredient(chosen).unwrap();
        assert_eq!(ing.name, "Chicken Breast");
    }

    #[test]
    fn test_choose_substitute_rejects_wrong_group() {
        let mut state = state();
        assert!(state.choose_substitute("tacos", "protein", "Tortillas").is_err());
        assert!(state.choose_substitute("tacos", "protein", "Salsa").is_err());
        assert!(state.ui.overrides_for("tacos").is_none());
    }

    #[test]
    fn test_delete_meal_forgets_selection() {
        let mut state = state();
        state.ui.select("tacos");
        state.ui.set_multiplier("tacos", 2).unwrap();

        state.delete_meal("Tacos").unwrap();
        assert!(state.ui.selected_meals.is_empty());
        assert_eq!(state.ui.multiplier("tacos"), 1);
    }

    #[test]
    fn test_grocery_list_uses_selection() {
        let mut state = state();
        assert!(state.grocery_list(&IndexMatcher::without_index()).is_empty());

        state.ui.select("tacos");
        let list = state.grocery_list(&IndexMatcher::without_index());
        assert_eq!(list.item_count(), 2);
    }
}

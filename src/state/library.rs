use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use crate::error::{PlannerError, Result};
use crate::grocery::constants::FUZZY_NAME_THRESHOLD;
use crate::models::ingredient::new_id;
use crate::models::{global_stores, Ingredient, Meal, Store, GLOBAL_CATEGORIES};

/// Recipes, stores and categories: the built-in starter set plus the user's
/// own records.
///
/// Starter meals are read-only; editing one clones it into the user's
/// collection under the same id, which then shadows the original.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealLibrary {
    #[serde(skip)]
    starter_meals: Vec<Meal>,

    #[serde(rename = "userMeals", default)]
    user_meals: Vec<Meal>,

    #[serde(rename = "userStores", default)]
    user_stores: Vec<Store>,

    #[serde(rename = "userCategories", default)]
    user_categories: Vec<String>,
}

impl MealLibrary {
    pub fn new(user_meals: Vec<Meal>) -> Self {
        Self {
            user_meals,
            ..Self::default()
        }
    }

    /// Attach read-only starter meals.
    pub fn with_starters(mut self, starters: Vec<Meal>) -> Self {
        self.starter_meals = starters;
        self
    }

    /// Starter meals not shadowed by a user copy, followed by user meals.
    pub fn all_meals(&self) -> Vec<&Meal> {
        self.starter_meals
            .iter()
            .filter(|s| !self.user_meals.iter().any(|u| u.id == s.id))
            .chain(self.user_meals.iter())
            .collect()
    }

    pub fn user_meals(&self) -> &[Meal] {
        &self.user_meals
    }

    pub fn is_starter(&self, meal_id: &str) -> bool {
        self.starter_meals.iter().any(|m| m.id == meal_id)
            && !self.user_meals.iter().any(|m| m.id == meal_id)
    }

    pub fn find(&self, meal_id: &str) -> Option<&Meal> {
        self.user_meals
            .iter()
            .find(|m| m.id == meal_id)
            .or_else(|| self.starter_meals.iter().find(|m| m.id == meal_id))
    }

    /// Look a meal up by id, exact name (case-insensitive), or the closest
    /// fuzzy name match.
    pub fn find_by_name(&self, query: &str) -> Option<&Meal> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let Some(meal) = self.find(query) {
            return Some(meal);
        }

        let lowered = query.to_lowercase();
        let meals = self.all_meals();

        if let Some(meal) = meals
            .iter()
            .find(|m| m.name.to_lowercase() == lowered)
            .copied()
        {
            return Some(meal);
        }

        meals
            .into_iter()
            .map(|m| (m, jaro_winkler(&m.name.to_lowercase(), &lowered)))
            .filter(|(_, score)| *score > FUZZY_NAME_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(m, _)| m)
    }

    /// Insert a new user meal or replace the one with the same id.
    ///
    /// The ingredient list is repaired to one default per group.
    pub fn save_meal(&mut self, mut meal: Meal) -> &Meal {
        if meal.id.trim().is_empty() {
            meal.id = new_id();
        }
        let ingredients = std::mem::take(&mut meal.ingredients);
        meal.replace_ingredients(ingredients);

        let idx = match self.user_meals.iter().position(|m| m.id == meal.id) {
            Some(idx) => {
                self.user_meals[idx] = meal;
                idx
            }
            None => {
                self.user_meals.push(meal);
                self.user_meals.len() - 1
            }
        };
        &self.user_meals[idx]
    }

    /// Mutable access to a meal for editing, cloning starter meals into the
    /// user collection first.
    pub fn edit_meal(&mut self, meal_id: &str) -> Result<&mut Meal> {
        if !self.user_meals.iter().any(|m| m.id == meal_id) {
            let starter = self
                .starter_meals
                .iter()
                .find(|m| m.id == meal_id)
                .cloned()
                .ok_or_else(|| PlannerError::MealNotFound(meal_id.to_string()))?;
            self.user_meals.push(starter);
        }

        self.user_meals
            .iter_mut()
            .find(|m| m.id == meal_id)
            .ok_or_else(|| PlannerError::MealNotFound(meal_id.to_string()))
    }

    /// Replace a meal's ingredient list (clone-on-edit for starters).
    pub fn replace_ingredients(&mut self, meal_id: &str, ingredients: Vec<Ingredient>) -> Result<()> {
        self.edit_meal(meal_id)?.replace_ingredients(ingredients);
        Ok(())
    }

    /// Delete a user meal. Starter meals cannot be deleted.
    pub fn delete_meal(&mut self, meal_id: &str) -> Result<Meal> {
        match self.user_meals.iter().position(|m| m.id == meal_id) {
            Some(idx) => Ok(self.user_meals.remove(idx)),
            None if self.starter_meals.iter().any(|m| m.id == meal_id) => {
                Err(PlannerError::ImmutableMeal(meal_id.to_string()))
            }
            None => Err(PlannerError::MealNotFound(meal_id.to_string())),
        }
    }

    /// Find an ingredient by id in any meal. Returns the owning meal too.
    pub fn find_ingredient(&self, ingredient_id: &str) -> Option<(&Meal, &Ingredient)> {
        self.all_meals().into_iter().find_map(|meal| {
            meal.ingredient(ingredient_id).map(|ing| (meal, ing))
        })
    }

    /// Built-in categories followed by user categories.
    pub fn categories(&self) -> Vec<&str> {
        let mut all: Vec<&str> = GLOBAL_CATEGORIES.to_vec();
        for cat in &self.user_categories {
            if !all.contains(&cat.as_str()) {
                all.push(cat);
            }
        }
        all
    }

    pub fn add_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::InvalidInput("Category needs a name".to_string()));
        }
        if self.categories().contains(&name) {
            return Err(PlannerError::Duplicate(name.to_string()));
        }
        self.user_categories.push(name.to_string());
        Ok(())
    }

    pub fn remove_category(&mut self, name: &str) -> Result<()> {
        let pos = self
            .user_categories
            .iter()
            .position(|c| c == name.trim())
            .ok_or_else(|| PlannerError::InvalidInput(format!("No user category '{}'", name)))?;
        self.user_categories.remove(pos);
        Ok(())
    }

    /// Built-in stores followed by user stores.
    pub fn stores(&self) -> Vec<Store> {
        let mut all = global_stores();
        all.extend(self.user_stores.iter().cloned());
        all
    }

    pub fn find_store(&self, name: &str) -> Option<Store> {
        self.stores().into_iter().find(|s| s.name == name)
    }

    pub fn add_store(&mut self, name: &str) -> Result<&Store> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::InvalidInput("Store needs a name".to_string()));
        }
        if self.stores().iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(PlannerError::Duplicate(name.to_string()));
        }
        self.user_stores.push(Store::new(&new_id(), name));
        Ok(&self.user_stores[self.user_stores.len() - 1])
    }

    pub fn remove_store(&mut self, name: &str) -> Result<Store> {
        let pos = self
            .user_stores
            .iter()
            .position(|s| s.name == name.trim())
            .ok_or_else(|| PlannerError::InvalidInput(format!("No user store '{}'", name)))?;
        Ok(self.user_stores.remove(pos))
    }

    /// Number of meals visible to the planner.
    pub fn len(&self) -> usize {
        self.all_meals().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::grocery::substitutes::repair_defaults;
use crate::models::ingredient::{new_id, Ingredient, RawIngredient};

/// Built-in meal categories, always offered alongside user categories.
pub const GLOBAL_CATEGORIES: [&str; 8] = [
    "Low Prep",
    "Medium Prep",
    "High Prep / Longer Cook Times",
    "Grilling",
    "Breakfast",
    "Crock Pot",
    "Sides",
    "Appetizers",
];

/// Category label used for meals saved without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A meal record as found in stored JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeal {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub ingredients: Option<Vec<Option<RawIngredient>>>,
}

/// A recipe: a name, a category and an ordered list of ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMeal")]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub category: String,
    pub ingredients: Vec<Ingredient>,
}

impl Meal {
    pub fn new(name: &str, category: &str, ingredients: Vec<Ingredient>) -> Self {
        let mut meal = Self {
            id: new_id(),
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            ingredients: Vec::new(),
        };
        meal.replace_ingredients(ingredients);
        meal
    }

    /// Same as [`Meal::new`] with a caller-chosen id.
    pub fn with_id(id: &str, name: &str, category: &str, ingredients: Vec<Ingredient>) -> Self {
        let mut meal = Self::new(name, category, ingredients);
        meal.id = id.to_string();
        meal
    }

    /// Replace the whole ingredient list, repairing the one-default-per-group
    /// invariant on the way in.
    pub fn replace_ingredients(&mut self, mut ingredients: Vec<Ingredient>) {
        repair_defaults(&mut ingredients);
        self.ingredients = ingredients;
    }

    /// Category used for display grouping.
    pub fn display_category(&self) -> &str {
        if self.category.is_empty() {
            UNCATEGORIZED
        } else {
            &self.category
        }
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }
}

impl From<RawMeal> for Meal {
    fn from(raw: RawMeal) -> Self {
        let id = match raw.id {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                let id = new_id();
                warn!(meal = ?raw.name, new_id = %id, "meal without id, assigned a new one");
                id
            }
        };

        let ingredients = raw
            .ingredients
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter_map(|raw_ing| {
                let name = raw_ing.name.clone();
                let ing = Ingredient::from_raw(raw_ing);
                if ing.is_none() {
                    warn!(meal_id = %id, ingredient = ?name, "dropping ingredient without id");
                }
                ing
            })
            .collect();

        Self {
            id,
            name: raw.name.map(|s| s.trim().to_string()).unwrap_or_default(),
            category: raw.category.map(|s| s.trim().to_string()).unwrap_or_default(),
            ingredients,
        }
    }
}

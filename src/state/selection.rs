use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{PlannerError, Result};
use crate::grocery::constants::DEFAULT_MULTIPLIER;
use crate::grocery::substitutes::SubstituteOverrides;
use crate::models::ExtraItem;
use crate::models::ingredient::coerce_qty;

/// Multipliers may have been stored as numbers or strings; anything that is
/// not a positive whole number is dropped so the default applies.
fn lenient_multipliers<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: HashMap<String, Value> =
        Option::<HashMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(meal_id, value)| {
            let n = match &value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }?;
            (n.is_finite() && n >= 1.0).then(|| (meal_id, n.round() as u32))
        })
        .collect())
}

/// Everything the user picked for the current planning period.
///
/// Field names on disk follow the planner's long-standing JSON layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerSelection {
    /// Selected meal ids, in selection order.
    #[serde(rename = "plannerMeals", default)]
    pub selected_meals: Vec<String>,

    #[serde(
        rename = "plannerMealMultipliers",
        default,
        deserialize_with = "lenient_multipliers"
    )]
    pub multipliers: HashMap<String, u32>,

    /// meal id -> group name -> chosen ingredient id.
    #[serde(rename = "plannerSubstituteSelections", default)]
    pub substitutes: HashMap<String, SubstituteOverrides>,

    /// meal id -> ingredient id -> included on the grocery list.
    #[serde(rename = "plannerIngredientChecks", default)]
    pub included: HashMap<String, HashMap<String, bool>>,

    /// meal id -> ingredient id -> free-text note.
    #[serde(rename = "plannerIngredientComments", default)]
    pub comments: HashMap<String, HashMap<String, String>>,

    #[serde(rename = "plannerExtras", default)]
    pub extras: Vec<ExtraItem>,
}

impl PlannerSelection {
    pub fn is_selected(&self, meal_id: &str) -> bool {
        self.selected_meals.iter().any(|id| id == meal_id)
    }

    /// Select or unselect a meal. Returns whether it is now selected.
    pub fn toggle_meal(&mut self, meal_id: &str) -> bool {
        if let Some(pos) = self.selected_meals.iter().position(|id| id == meal_id) {
            self.selected_meals.remove(pos);
            false
        } else {
            self.selected_meals.push(meal_id.to_string());
            true
        }
    }

    pub fn select(&mut self, meal_id: &str) {
        if !self.is_selected(meal_id) {
            self.selected_meals.push(meal_id.to_string());
        }
    }

    /// Select every given meal, keeping existing selection order.
    pub fn select_all<'a, I>(&mut self, meal_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in meal_ids {
            self.select(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_meals.clear();
    }

    pub fn multiplier(&self, meal_id: &str) -> u32 {
        self.multipliers
            .get(meal_id)
            .copied()
            .filter(|&m| m > 0)
            .unwrap_or(DEFAULT_MULTIPLIER)
    }

    pub fn set_multiplier(&mut self, meal_id: &str, multiplier: u32) -> Result<()> {
        if multiplier == 0 {
            return Err(PlannerError::InvalidInput(
                "Multiplier must be at least 1".to_string(),
            ));
        }
        self.multipliers.insert(meal_id.to_string(), multiplier);
        Ok(())
    }

    pub fn overrides_for(&self, meal_id: &str) -> Option<&SubstituteOverrides> {
        self.substitutes.get(meal_id)
    }

    /// Record the user's substitute choice for one group of one meal.
    pub fn choose_substitute(&mut self, meal_id: &str, group: &str, ingredient_id: &str) {
        self.substitutes
            .entry(meal_id.to_string())
            .or_default()
            .insert(group.to_string(), ingredient_id.to_string());
    }

    /// Forget a substitute choice so the recipe default applies again.
    pub fn clear_substitute(&mut self, meal_id: &str, group: &str) {
        if let Some(groups) = self.substitutes.get_mut(meal_id) {
            groups.remove(group);
            if groups.is_empty() {
                self.substitutes.remove(meal_id);
            }
        }
    }

    /// Ingredients are included unless explicitly unchecked.
    pub fn is_included(&self, meal_id: &str, ingredient_id: &str) -> bool {
        self.included
            .get(meal_id)
            .and_then(|m| m.get(ingredient_id))
            .copied()
            .unwrap_or(true)
    }

    /// Flip an ingredient's inclusion. Returns the new state.
    pub fn toggle_ingredient(&mut self, meal_id: &str, ingredient_id: &str) -> bool {
        let next = !self.is_included(meal_id, ingredient_id);
        self.included
            .entry(meal_id.to_string())
            .or_default()
            .insert(ingredient_id.to_string(), next);
        next
    }

    pub fn comment(&self, meal_id: &str, ingredient_id: &str) -> Option<&str> {
        self.comments
            .get(meal_id)
            .and_then(|m| m.get(ingredient_id))
            .map(String::as_str)
            .filter(|c| !c.trim().is_empty())
    }

    /// Set a note on an ingredient; an empty note removes it.
    pub fn set_comment(&mut self, meal_id: &str, ingredient_id: &str, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            if let Some(notes) = self.comments.get_mut(meal_id) {
                notes.remove(ingredient_id);
            }
            return;
        }
        self.comments
            .entry(meal_id.to_string())
            .or_default()
            .insert(ingredient_id.to_string(), text.to_string());
    }

    /// Add a manual shopping-list item.
    ///
    /// Quantity text that is not a positive number becomes 1.
    pub fn add_extra(&mut self, name: &str, qty: &str, store: &str) -> Result<&ExtraItem> {
        if name.trim().is_empty() {
            return Err(PlannerError::InvalidInput(
                "Extra item needs a name".to_string(),
            ));
        }
        let qty = coerce_qty(Some(&Value::String(qty.to_string())));
        self.extras.push(ExtraItem::new(name, qty, "", store));
        Ok(&self.extras[self.extras.len() - 1])
    }

    /// Remove an extra by id, or by its 1-based position in the list.
    pub fn remove_extra(&mut self, id_or_position: &str) -> Result<ExtraItem> {
        let pos = self
            .extras
            .iter()
            .position(|e| e.id == id_or_position)
            .or_else(|| {
                id_or_position
                    .parse::<usize>()
                    .ok()
                    .filter(|&n| n >= 1 && n <= self.extras.len())
                    .map(|n| n - 1)
            })
            .ok_or_else(|| PlannerError::InvalidInput(format!("No extra item '{}'", id_or_position)))?;

        Ok(self.extras.remove(pos))
    }

    /// Drop choices that refer to meals no longer in the library.
    pub fn forget_meal(&mut self, meal_id: &str) {
        self.selected_meals.retain(|id| id != meal_id);
        self.multipliers.remove(meal_id);
        self.substitutes.remove(meal_id);
        self.included.remove(meal_id);
        self.comments.remove(meal_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toggle_meal() {
        let mut sel = PlannerSelection::default();
        assert!(sel.toggle_meal("tacos"));
        assert!(sel.is_selected("tacos"));
        assert!(!sel.toggle_meal("tacos"));
        assert!(!sel.is_selected("tacos"));
    }

    #[test]
    fn test_multiplier_defaults_and_validation() {
        let mut sel = PlannerSelection::default();
        assert_eq!(sel.multiplier("tacos"), 1);
        sel.set_multiplier("tacos", 3).unwrap();
        assert_eq!(sel.multiplier("tacos"), 3);
        assert!(sel.set_multiplier("tacos", 0).is_err());
        assert_eq!(sel.multiplier("tacos"), 3);
    }

    #[test]
    fn test_inclusion_defaults_true_and_toggles() {
        let mut sel = PlannerSelection::default();
        assert!(sel.is_included("m", "i"));
        assert!(!sel.toggle_ingredient("m", "i"));
        assert!(!sel.is_included("m", "i"));
        assert!(sel.toggle_ingredient("m", "i"));
        assert!(sel.is_included("m", "i"));
    }

    #[test]
    fn test_substitute_choice_and_clear() {
        let mut sel = PlannerSelection::default();
        sel.choose_substitute("m", "protein", "chicken");
        assert_eq!(sel.overrides_for("m").unwrap()["protein"], "chicken");
        sel.clear_substitute("m", "protein");
        assert!(sel.overrides_for("m").is_none());
    }

    #[test]
    fn test_comments() {
        let mut sel = PlannerSelection::default();
        sel.set_comment("m", "i", "  organic ");
        assert_eq!(sel.comment("m", "i"), Some("organic"));
        sel.set_comment("m", "i", "");
        assert_eq!(sel.comment("m", "i"), None);
    }

    #[test]
    fn test_extras() {
        let mut sel = PlannerSelection::default();
        assert!(sel.add_extra("  ", "1", "").is_err());

        let id = sel.add_extra("Paper Towels", "abc", "Walmart").unwrap().id.clone();
        sel.add_extra("Foil", "2", "").unwrap();
        assert_eq!(sel.extras[0].qty, 1.0);
        assert_eq!(sel.extras[0].unit, "CT");

        let removed = sel.remove_extra("2").unwrap();
        assert_eq!(removed.name, "Foil");
        let removed = sel.remove_extra(&id).unwrap();
        assert_eq!(removed.name, "Paper Towels");
        assert!(sel.remove_extra("1").is_err());
    }

    #[test]
    fn test_lenient_deserialize() {
        let sel: PlannerSelection = serde_json::from_value(json!({
            "plannerMeals": ["a", "b"],
            "plannerMealMultipliers": {"a": 2, "b": "3", "c": 0, "d": "x"},
            "collapsedCategories": ["Sides"]
        }))
        .unwrap();

        assert_eq!(sel.multiplier("a"), 2);
        assert_eq!(sel.multiplier("b"), 3);
        assert_eq!(sel.multiplier("c"), 1);
        assert_eq!(sel.multiplier("d"), 1);
        assert!(sel.extras.is_empty());
    }

    #[test]
    fn test_forget_meal() {
        let mut sel = PlannerSelection::default();
        sel.select("m");
        sel.set_multiplier("m", 2).unwrap();
        sel.choose_substitute("m", "g", "i");
        sel.forget_meal("m");
        assert_eq!(sel, PlannerSelection::default());
    }
}

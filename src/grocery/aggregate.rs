use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::grocery::constants::{DEFAULT_UNIT, OTHER_STORE};
use crate::grocery::matcher::IndexMatcher;
use crate::grocery::substitutes::{resolve_active_ingredients, SubstituteOverrides};
use crate::models::ingredient::sanitize_qty;
use crate::models::{ExtraItem, Meal};
use crate::state::PlannerSelection;

/// A meal picked for the planning period, with its repeat factor.
#[derive(Debug, Clone, Copy)]
pub struct SelectedMeal<'a> {
    pub meal: &'a Meal,
    pub multiplier: u32,
}

impl<'a> SelectedMeal<'a> {
    pub fn new(meal: &'a Meal, multiplier: u32) -> Self {
        Self { meal, multiplier }
    }
}

/// One line on the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroceryItem {
    pub name: String,
    pub qty: f64,
    pub unit: String,
    /// Planner notes attached to the ingredients merged into this line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl GroceryItem {
    /// Duplicate-merge key: lowercase trimmed name and unit.
    pub fn merge_key(&self) -> String {
        merge_key(&self.name, &self.unit)
    }
}

fn merge_key(name: &str, unit: &str) -> String {
    format!(
        "{}|{}",
        name.trim().to_lowercase(),
        unit.trim().to_lowercase()
    )
}

/// aisle -> items
pub type AisleMap = BTreeMap<String, Vec<GroceryItem>>;

/// The consolidated shopping list: store -> aisle -> items.
///
/// Stores and aisles iterate alphabetically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroceryList {
    stores: BTreeMap<String, AisleMap>,
}

impl GroceryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item, merging it with an existing line of the same name and
    /// unit in the same store and aisle. The first-seen spelling is kept.
    pub fn add(
        &mut self,
        store: &str,
        aisle: &str,
        name: &str,
        qty: f64,
        unit: &str,
        comment: Option<&str>,
    ) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let store = match store.trim() {
            "" => OTHER_STORE,
            s => s,
        };
        let unit = match unit.trim() {
            "" => DEFAULT_UNIT,
            u => u,
        };
        let qty = sanitize_qty(qty);
        let key = merge_key(name, unit);

        let bucket = self
            .stores
            .entry(store.to_string())
            .or_default()
            .entry(aisle.to_string())
            .or_default();

        let item = match bucket.iter().position(|i| i.merge_key() == key) {
            Some(pos) => {
                let existing = &mut bucket[pos];
                existing.qty += qty;
                existing
            }
            None => {
                bucket.push(GroceryItem {
                    name: name.to_string(),
                    qty,
                    unit: unit.to_string(),
                    comments: Vec::new(),
                });
                let last = bucket.len() - 1;
                &mut bucket[last]
            }
        };

        if let Some(comment) = comment.map(str::trim).filter(|c| !c.is_empty()) {
            if !item.comments.iter().any(|c| c == comment) {
                item.comments.push(comment.to_string());
            }
        }
    }

    /// Store names in display order: alphabetical, with "Other" last.
    pub fn store_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .stores
            .keys()
            .map(String::as_str)
            .filter(|s| *s != OTHER_STORE)
            .collect();
        if self.stores.contains_key(OTHER_STORE) {
            names.push(OTHER_STORE);
        }
        names
    }

    pub fn aisles(&self, store: &str) -> Option<&AisleMap> {
        self.stores.get(store)
    }

    pub fn items(&self, store: &str, aisle: &str) -> &[GroceryItem] {
        self.stores
            .get(store)
            .and_then(|a| a.get(aisle))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every line as (store, aisle, item), stores in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &GroceryItem)> {
        self.store_names().into_iter().flat_map(move |store| {
            self.stores[store]
                .iter()
                .flat_map(move |(aisle, items)| items.iter().map(move |i| (store, aisle.as_str(), i)))
        })
    }

    pub fn item_count(&self) -> usize {
        self.stores
            .values()
            .flat_map(|aisles| aisles.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Resolve the selection's meal ids against the known meals.
///
/// Ids without a matching meal are skipped, and an id listed more than once
/// counts once.
pub fn selected_meals<'a, I>(meals: I, selection: &PlannerSelection) -> Vec<SelectedMeal<'a>>
where
    I: IntoIterator<Item = &'a Meal>,
{
    let by_id: HashMap<&str, &Meal> = meals.into_iter().map(|m| (m.id.as_str(), m)).collect();
    let mut seen: HashSet<&str> = HashSet::new();

    selection
        .selected_meals
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| match by_id.get(id.as_str()).copied() {
            Some(meal) => Some(SelectedMeal::new(meal, selection.multiplier(id))),
            None => {
                debug!(meal_id = %id, "selected meal not found, skipping");
                None
            }
        })
        .collect()
}

/// Build the shopping list for the selected meals plus manual extras.
///
/// For every selected meal, each active ingredient (one per substitute group)
/// that the user has not unchecked is scaled by the meal multiplier and filed
/// under its store and aisle. Extras are added unscaled. Same-name, same-unit
/// lines within one store and aisle are summed.
pub fn build_grocery_list(
    selected: &[SelectedMeal],
    extras: &[ExtraItem],
    selection: &PlannerSelection,
    matcher: &IndexMatcher,
) -> GroceryList {
    let mut list = GroceryList::new();
    let no_overrides = SubstituteOverrides::new();

    for entry in selected {
        let meal = entry.meal;
        let multiplier = entry.multiplier.max(1) as f64;
        let overrides = selection.overrides_for(&meal.id).unwrap_or(&no_overrides);

        for ing in resolve_active_ingredients(meal, overrides) {
            if !selection.is_included(&meal.id, &ing.id) {
                continue;
            }
            if ing.name.trim().is_empty() {
                debug!(meal_id = %meal.id, ingredient_id = %ing.id, "skipping ingredient without a name");
                continue;
            }

            list.add(
                &ing.store,
                &matcher.aisle_for(&ing.name),
                &ing.name,
                sanitize_qty(ing.qty) * multiplier,
                &ing.unit,
                selection.comment(&meal.id, &ing.id),
            );
        }
    }

    for extra in extras {
        if extra.name.trim().is_empty() {
            continue;
        }
        list.add(
            &extra.store,
            &matcher.aisle_for(&extra.name),
            &extra.name,
            extra.qty,
            &extra.unit,
            None,
        );
    }

    list
}

/// Shopping list for the current planner state in one call.
pub fn grocery_list_for<'a, I>(
    meals: I,
    selection: &PlannerSelection,
    matcher: &IndexMatcher,
) -> GroceryList
where
    I: IntoIterator<Item = &'a Meal>,
{
    let selected = selected_meals(meals, selection);
    build_grocery_list(&selected, &selection.extras, selection, matcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndexEntry, IngredientIndex, Ingredient};
    use assert_float_eq::assert_f64_near;

    fn produce_index() -> IngredientIndex {
        let mut index = IngredientIndex::new();
        index.insert("1".into(), IndexEntry::new("Onions", "onion", "Produce"));
        index.insert("2".into(), IndexEntry::new("Milk", "milk", "Dairy"));
        index
    }

    #[test]
    fn test_add_merges_case_and_whitespace_variants() {
        let mut list = GroceryList::new();
        list.add("Aldi", "Produce", "Onion", 2.0, "CT", None);
        list.add("Aldi", "Produce", "onion ", 3.0, " ct", None);

        let items = list.items("Aldi", "Produce");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Onion");
        assert_eq!(items[0].unit, "CT");
        assert_f64_near!(items[0].qty, 5.0);
    }

    #[test]
    fn test_add_keeps_units_apart() {
        let mut list = GroceryList::new();
        list.add("Aldi", "Dairy", "Milk", 1.0, "GAL", None);
        list.add("Aldi", "Dairy", "Milk", 2.0, "QT", None);
        assert_eq!(list.items("Aldi", "Dairy").len(), 2);
    }

    #[test]
    fn test_add_defaults_store_and_skips_blank_names() {
        let mut list = GroceryList::new();
        list.add("  ", "Produce", "Onion", 1.0, "", None);
        list.add("Aldi", "Produce", "   ", 1.0, "CT", None);

        assert_eq!(list.store_names(), vec!["Other"]);
        assert_eq!(list.items("Other", "Produce")[0].unit, "CT");
        assert_eq!(list.item_count(), 1);
    }

    #[test]
    fn test_stores_sorted_with_other_last() {
        let mut list = GroceryList::new();
        list.add("Walmart", "A", "x1", 1.0, "CT", None);
        list.add("", "A", "x2", 1.0, "CT", None);
        list.add("Aldi", "A", "x3", 1.0, "CT", None);
        assert_eq!(list.store_names(), vec!["Aldi", "Walmart", "Other"]);

        let order: Vec<&str> = list.iter().map(|(_, _, i)| i.name.as_str()).collect();
        assert_eq!(order, vec!["x3", "x1", "x2"]);
    }

    #[test]
    fn test_comments_attach_once() {
        let mut list = GroceryList::new();
        list.add("Aldi", "Produce", "Onion", 1.0, "CT", Some("sweet"));
        list.add("Aldi", "Produce", "onion", 1.0, "CT", Some("sweet"));
        list.add("Aldi", "Produce", "onion", 1.0, "CT", Some(" "));
        assert_eq!(list.items("Aldi", "Produce")[0].comments, vec!["sweet"]);
    }

    #[test]
    fn test_excluded_ingredient_is_skipped_and_extras_unscaled() {
        let onion = Ingredient::new("Onion", 2.0, "CT", "Aldi");
        let milk = Ingredient::new("Milk", 1.0, "GAL", "Aldi");
        let milk_id = milk.id.clone();
        let meal = Meal::with_id("soup", "Soup", "Sides", vec![onion, milk]);

        let mut selection = PlannerSelection::default();
        selection.select("soup");
        selection.set_multiplier("soup", 2).unwrap();
        selection.toggle_ingredient("soup", &milk_id);
        selection.add_extra("Onion", "1", "Aldi").unwrap();

        let index = produce_index();
        let list = grocery_list_for([&meal], &selection, &IndexMatcher::new(&index));

        assert!(list.aisles("Aldi").unwrap().get("Dairy").is_none());
        let produce = list.items("Aldi", "Produce");
        assert_eq!(produce.len(), 1);
        // 2 * 2 from the meal + 1 unscaled extra
        assert_f64_near!(produce[0].qty, 5.0);
    }

    #[test]
    fn test_dangling_selection_is_skipped() {
        let meal = Meal::with_id("soup", "Soup", "", vec![Ingredient::new("Onion", 1.0, "CT", "")]);
        let mut selection = PlannerSelection::default();
        selection.select("gone");
        selection.select("soup");

        let selected = selected_meals([&meal], &selection);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].meal.id, "soup");
    }

    #[test]
    fn test_repeated_selection_counts_once() {
        let meal = Meal::with_id("soup", "Soup", "", vec![Ingredient::new("Onion", 1.0, "CT", "")]);
        let selection: PlannerSelection =
            serde_json::from_value(serde_json::json!({"plannerMeals": ["soup", "soup"]})).unwrap();

        assert_eq!(selected_meals([&meal], &selection).len(), 1);
        let list = grocery_list_for([&meal], &selection, &IndexMatcher::without_index());
        assert_f64_near!(list.items("Other", "Other")[0].qty, 1.0);
    }

    #[test]
    fn test_meal_ingredient_without_name_is_skipped() {
        let meal = Meal::with_id(
            "soup",
            "Soup",
            "",
            vec![
                Ingredient::new("", 2.0, "CT", "Aldi"),
                Ingredient::new("   ", 1.0, "CT", "Aldi"),
                Ingredient::new("Onion", 1.0, "CT", "Aldi"),
            ],
        );

        let index = produce_index();
        let list = build_grocery_list(
            &[SelectedMeal::new(&meal, 2)],
            &[],
            &PlannerSelection::default(),
            &IndexMatcher::new(&index),
        );

        assert_eq!(list.item_count(), 1);
        assert_eq!(list.items("Aldi", "Produce")[0].name, "Onion");
        assert!(list.aisles("Aldi").unwrap().get("Other").is_none());
    }

    #[test]
    fn test_zero_multiplier_counts_once() {
        let meal = Meal::with_id("soup", "Soup", "", vec![Ingredient::new("Onion", 2.0, "CT", "")]);
        let selection = PlannerSelection::default();
        let list = build_grocery_list(
            &[SelectedMeal::new(&meal, 0)],
            &[],
            &selection,
            &IndexMatcher::without_index(),
        );
        assert_f64_near!(list.items("Other", "Other")[0].qty, 2.0);
    }
}

use assert_float_eq::assert_f64_near;

use grocery_planner_rs::grocery::{
    build_grocery_list, grocery_list_for, resolve_active_ingredients, IndexMatcher, SelectedMeal,
    SubstituteOverrides,
};
use grocery_planner_rs::models::{ExtraItem, IndexEntry, IngredientIndex, Ingredient, Meal};
use grocery_planner_rs::state::{AppState, MealLibrary, PlannerSelection};

fn tacos() -> Meal {
    Meal::with_id(
        "tacos",
        "Tacos",
        "Low Prep",
        vec![
            Ingredient::new("Tortillas", 1.0, "CT", "Walmart"),
            Ingredient::new("Ground Beef", 1.0, "LB", "Walmart").in_group("protein", true),
            Ingredient::new("Chicken Breast", 1.0, "LB", "Walmart").in_group("protein", false),
        ],
    )
}

fn index() -> IngredientIndex {
    let mut index = IngredientIndex::new();
    index.insert("1".into(), IndexEntry::new("Flour Tortillas", "flour tortillas", "Bakery"));
    index.insert("2".into(), IndexEntry::new("Ground Beef", "ground beef", "Meat"));
    index.insert(
        "3".into(),
        IndexEntry::new("Boneless Chicken Breast", "boneless chicken breast", "Meat")
            .with_reason("keyword: chicken"),
    );
    index.insert("4".into(), IndexEntry::new("Yellow Onion", "yellow onion", "Produce"));
    index
}

fn names_and_qty(list: &grocery_planner_rs::grocery::GroceryList) -> Vec<(String, f64)> {
    list.iter()
        .map(|(_, _, item)| (item.name.clone(), item.qty))
        .collect()
}

#[test]
fn test_tacos_default_protein_doubled() {
    let meal = tacos();
    let mut selection = PlannerSelection::default();
    selection.select("tacos");
    selection.set_multiplier("tacos", 2).unwrap();

    let index = index();
    let list = grocery_list_for([&meal], &selection, &IndexMatcher::new(&index));

    let tortillas = list.items("Walmart", "Bakery");
    assert_eq!(tortillas.len(), 1);
    assert_f64_near!(tortillas[0].qty, 2.0);

    let meat = list.items("Walmart", "Meat");
    assert_eq!(meat.len(), 1);
    assert_eq!(meat[0].name, "Ground Beef");
    assert_f64_near!(meat[0].qty, 2.0);
}

#[test]
fn test_tacos_with_chicken_override() {
    let meal = tacos();
    let chicken_id = meal.ingredients[2].id.clone();

    let mut selection = PlannerSelection::default();
    selection.select("tacos");
    selection.set_multiplier("tacos", 2).unwrap();
    selection.choose_substitute("tacos", "protein", &chicken_id);

    let index = index();
    let list = grocery_list_for([&meal], &selection, &IndexMatcher::new(&index));

    let meat = list.items("Walmart", "Meat");
    assert_eq!(meat.len(), 1);
    assert_eq!(meat[0].name, "Chicken Breast");
    assert_f64_near!(meat[0].qty, 2.0);
    assert_eq!(list.item_count(), 2);
}

#[test]
fn test_building_twice_gives_same_list() {
    let meal = tacos();
    let mut selection = PlannerSelection::default();
    selection.select("tacos");
    selection.set_multiplier("tacos", 3).unwrap();
    selection.add_extra("Yellow Onion", "2", "Aldi").unwrap();

    let index = index();
    let matcher = IndexMatcher::new(&index);

    let first = grocery_list_for([&meal], &selection, &matcher);
    let second = grocery_list_for([&meal], &selection, &matcher);
    assert_eq!(first, second);
}

#[test]
fn test_onion_variants_merge() {
    let soup = Meal::with_id("soup", "Soup", "", vec![Ingredient::new("Onion", 2.0, "CT", "Aldi")]);
    let stew = Meal::with_id("stew", "Stew", "", vec![Ingredient::new("onion ", 3.0, "CT", "Aldi")]);

    let index = index();
    let list = build_grocery_list(
        &[SelectedMeal::new(&soup, 1), SelectedMeal::new(&stew, 1)],
        &[],
        &PlannerSelection::default(),
        &IndexMatcher::new(&index),
    );

    assert_eq!(names_and_qty(&list), vec![("Onion".to_string(), 5.0)]);
    assert_eq!(list.items("Aldi", "Produce").len(), 1);
}

#[test]
fn test_multiplier_three_scales_quantity() {
    let meal = Meal::with_id("rice", "Rice", "", vec![Ingredient::new("Rice", 2.0, "LB", "")]);
    let list = build_grocery_list(
        &[SelectedMeal::new(&meal, 3)],
        &[],
        &PlannerSelection::default(),
        &IndexMatcher::without_index(),
    );
    assert_f64_near!(list.items("Other", "Other")[0].qty, 6.0);
}

#[test]
fn test_empty_index_puts_everything_in_other() {
    let meal = tacos();
    let empty = IngredientIndex::new();
    let extras = vec![ExtraItem::new("Paper Towels", 1.0, "CT", "Walmart")];

    let list = build_grocery_list(
        &[SelectedMeal::new(&meal, 1)],
        &extras,
        &PlannerSelection::default(),
        &IndexMatcher::new(&empty),
    );

    let aisles = list.aisles("Walmart").unwrap();
    assert_eq!(aisles.keys().collect::<Vec<_>>(), vec!["Other"]);
    assert_eq!(list.item_count(), 3);
}

#[test]
fn test_default_fallback_is_stable() {
    let meal = Meal::with_id(
        "bowl",
        "Bowl",
        "",
        vec![
            Ingredient::new("Brown Rice", 1.0, "CUP", "").in_group("base", false),
            Ingredient::new("Quinoa", 1.0, "CUP", "").in_group("base", false),
        ],
    );
    let overrides = SubstituteOverrides::new();

    for _ in 0..5 {
        let active = resolve_active_ingredients(&meal, &overrides);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Brown Rice");
    }
}

#[test]
fn test_state_round_trip_feeds_the_list() {
    let mut state = AppState::new(MealLibrary::new(vec![tacos()]), PlannerSelection::default());
    state.ui.select("tacos");
    state.choose_substitute("Tacos", "protein", "Chicken Breast").unwrap();

    let json = serde_json::to_string(&state).unwrap();
    let reloaded: AppState = serde_json::from_str(&json).unwrap();

    let list = reloaded.grocery_list(&IndexMatcher::without_index());
    let names: Vec<String> = names_and_qty(&list).into_iter().map(|(n, _)| n).collect();
    assert!(names.contains(&"Chicken Breast".to_string()));
    assert!(!names.contains(&"Ground Beef".to_string()));
}

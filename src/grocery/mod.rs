pub mod aggregate;
pub mod constants;
pub mod matcher;
pub mod normalize;
pub mod substitutes;

pub use aggregate::{
    build_grocery_list, grocery_list_for, selected_meals, GroceryItem, GroceryList, SelectedMeal,
};
pub use constants::*;
pub use matcher::{aisle_for, find_best_match, IndexMatcher, MatchWeights, SearchHit};
pub use normalize::normalize;
pub use substitutes::{
    current_choice, existing_groups, group_options, repair_defaults, resolve_active_ingredients,
    reuse_ingredient, set_default, substitute_groups, suggest_groups, GroupOption,
    SubstituteGroup, SubstituteOverrides,
};

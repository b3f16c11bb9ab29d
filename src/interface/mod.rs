pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_meal_selection, prompt_multiplier, prompt_new_meal, prompt_substitute, prompt_yes_no,
};
pub use render::{
    display_extras, display_grocery_list, display_meal_detail, display_meals,
    display_search_hits, format_qty, store_links, write_grocery_csv,
};

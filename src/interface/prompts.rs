use dialoguer::{Confirm, Input, MultiSelect, Select};

use crate::error::{PlannerError, Result};
use crate::grocery::{
    current_choice, group_options, reuse_ingredient, set_default, substitute_groups,
    suggest_groups, IndexMatcher, SubstituteOverrides, AUTOCOMPLETE_LIMIT, DEFAULT_UNIT,
    MAX_PROMPT_MULTIPLIER,
};
use crate::models::ingredient::coerce_qty;
use crate::models::{Ingredient, Meal};
use crate::state::{MealLibrary, PlannerSelection};

/// Prompt for how many times a meal is planned.
pub fn prompt_multiplier(meal_name: &str, current: u32) -> Result<u32> {
    let options: Vec<String> = (1..=MAX_PROMPT_MULTIPLIER)
        .map(|n| format!("x{}", n))
        .collect();

    let default = current.clamp(1, MAX_PROMPT_MULTIPLIER) as usize - 1;

    let selection = Select::new()
        .with_prompt(format!("How many times will you make '{}'?", meal_name))
        .items(&options)
        .default(default)
        .interact()?;

    Ok(selection as u32 + 1)
}

/// Let the user tick meals for the planning period.
///
/// Returns the ids of every ticked meal.
pub fn prompt_meal_selection(meals: &[&Meal], selection: &PlannerSelection) -> Result<Vec<String>> {
    if meals.is_empty() {
        return Ok(Vec::new());
    }

    let labels: Vec<String> = meals
        .iter()
        .map(|m| format!("{} [{}]", m.name, m.display_category()))
        .collect();
    let checked: Vec<bool> = meals.iter().map(|m| selection.is_selected(&m.id)).collect();

    let picked = MultiSelect::new()
        .with_prompt("Select meals (space to toggle, enter to confirm)")
        .items(&labels)
        .defaults(&checked)
        .interact()?;

    Ok(picked.into_iter().map(|i| meals[i].id.clone()).collect())
}

/// Pick the member of a substitute group to shop for.
///
/// Returns the chosen ingredient's id.
pub fn prompt_substitute(
    meal: &Meal,
    group: &str,
    overrides: &SubstituteOverrides,
) -> Result<String> {
    let groups = substitute_groups(meal);
    let members = groups
        .iter()
        .find(|g| g.name == group)
        .map(|g| g.members.clone())
        .ok_or_else(|| {
            PlannerError::InvalidInput(format!("{} has no substitute group '{}'", meal.name, group))
        })?;

    let active_id = current_choice(meal, group, overrides).map(|i| i.id.clone());

    let options: Vec<String> = members
        .iter()
        .map(|ing| {
            let star = if ing.is_default { " (default)" } else { "" };
            format!("{} ({} {}){}", ing.name, ing.qty, ing.unit, star)
        })
        .collect();

    let default = members
        .iter()
        .position(|ing| Some(&ing.id) == active_id.as_ref())
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(format!("Which '{}' for {}?", group, meal.name))
        .items(&options)
        .default(default)
        .interact()?;

    Ok(members[selection].id.clone())
}

/// Prompt for a substitute group name, offering existing names as completions.
fn prompt_group_name(library: &MealLibrary) -> Result<String> {
    let input: String = Input::new()
        .with_prompt("Substitute group (Enter for none)")
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim().to_string();
    if input.is_empty() {
        return Ok(input);
    }

    let suggestions = suggest_groups(library.all_meals(), &input);
    if suggestions.is_empty() || suggestions.iter().any(|s| *s == input) {
        return Ok(input);
    }

    let mut options = suggestions.clone();
    options.push(format!("New group '{}'", input));

    let selection = Select::new()
        .with_prompt("Did you mean an existing group?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(if selection < suggestions.len() {
        suggestions[selection].clone()
    } else {
        input
    })
}

/// Offer to reuse an ingredient already filed under `group` elsewhere.
fn prompt_reuse(library: &MealLibrary, group: &str) -> Result<Option<Ingredient>> {
    let options = group_options(library.all_meals(), group);
    if options.is_empty() {
        return Ok(None);
    }

    let mut labels: Vec<String> = options
        .iter()
        .map(|o| {
            let meal = library
                .find(o.meal_id)
                .map(|m| m.name.as_str())
                .unwrap_or(o.meal_id);
            format!("{} ({} {}) from {}", o.ingredient.name, o.ingredient.qty, o.ingredient.unit, meal)
        })
        .collect();
    labels.push("Enter a new ingredient".to_string());

    let selection = Select::new()
        .with_prompt(format!("Reuse an ingredient from group '{}'?", group))
        .items(&labels)
        .default(labels.len() - 1)
        .interact()?;

    Ok(options
        .get(selection)
        .map(|o| reuse_ingredient(o.ingredient, group)))
}

/// Ask for an ingredient name, offering index descriptions as suggestions.
fn prompt_ingredient_name(matcher: &IndexMatcher) -> Result<String> {
    let input: String = Input::new()
        .with_prompt("Ingredient name (Enter to finish)")
        .allow_empty(true)
        .interact_text()?;

    let input = input.trim().to_string();
    let hits = matcher.search(&input, AUTOCOMPLETE_LIMIT);
    if hits.is_empty() || hits.iter().any(|h| h.entry.description == input) {
        return Ok(input);
    }

    let mut options: Vec<String> = hits
        .iter()
        .map(|h| format!("{}  [{}]", h.entry.description, h.entry.aisle))
        .collect();
    options.push(format!("Keep '{}'", input));

    let selection = Select::new()
        .with_prompt("Matching index entries")
        .items(&options)
        .default(options.len() - 1)
        .interact()?;

    Ok(hits
        .get(selection)
        .map(|h| h.entry.description.clone())
        .unwrap_or(input))
}

/// Prompt for one new ingredient's details.
fn prompt_ingredient_details(
    name: &str,
    group: &str,
    store_names: &[String],
) -> Result<Ingredient> {
    let qty: String = Input::new()
        .with_prompt("Quantity")
        .default("1".to_string())
        .interact_text()?;

    let unit: String = Input::new()
        .with_prompt("Unit")
        .default(DEFAULT_UNIT.to_string())
        .interact_text()?;

    let mut stores = store_names.to_vec();
    stores.push("No store".to_string());
    let store_idx = Select::new()
        .with_prompt("Store")
        .items(&stores)
        .default(0)
        .interact()?;
    let store = store_names.get(store_idx).map(String::as_str).unwrap_or("");

    let qty = coerce_qty(Some(&serde_json::Value::String(qty)));
    Ok(Ingredient::new(name, qty, &unit, store).in_group(group, false))
}

/// Interactively build a new meal.
///
/// Grouped ingredients may be copied from other meals' groups. Each group
/// with more than one member gets its default picked at the end.
pub fn prompt_new_meal(library: &MealLibrary, matcher: &IndexMatcher) -> Result<Meal> {
    let name: String = Input::new().with_prompt("Meal name").interact_text()?;
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(PlannerError::InvalidInput("Meal needs a name".to_string()));
    }

    let categories = library.categories();
    let cat_idx = Select::new()
        .with_prompt("Category")
        .items(&categories)
        .default(0)
        .interact()?;
    let category = categories[cat_idx].to_string();

    let store_names: Vec<String> = library.stores().into_iter().map(|s| s.name).collect();
    let mut ingredients: Vec<Ingredient> = Vec::new();

    loop {
        let ing_name = prompt_ingredient_name(matcher)?;
        if ing_name.is_empty() {
            break;
        }

        let group = prompt_group_name(library)?;
        let reused = if group.is_empty() {
            None
        } else {
            prompt_reuse(library, &group)?
        };

        let ingredient = match reused {
            Some(ing) => ing,
            None => prompt_ingredient_details(&ing_name, &group, &store_names)?,
        };
        println!("Added: {}", ingredient.name);
        ingredients.push(ingredient);
    }

    pick_group_defaults(&mut ingredients)?;

    Ok(Meal::new(&name, &category, ingredients))
}

/// Ask which member should be the default for every multi-member group.
fn pick_group_defaults(ingredients: &mut [Ingredient]) -> Result<()> {
    let draft = Meal::with_id("draft", "draft", "", ingredients.to_vec());
    let groups: Vec<(String, Vec<String>)> = substitute_groups(&draft)
        .into_iter()
        .filter(|g| !g.is_trivial())
        .map(|g| {
            (
                g.name.to_string(),
                g.members.iter().map(|m| m.id.clone()).collect(),
            )
        })
        .collect();

    for (group, member_ids) in groups {
        let labels: Vec<String> = member_ids
            .iter()
            .filter_map(|id| ingredients.iter().find(|i| &i.id == id))
            .map(|i| i.name.clone())
            .collect();

        let choice = Select::new()
            .with_prompt(format!("Default for group '{}'", group))
            .items(&labels)
            .default(0)
            .interact()?;

        if let Some(idx) = ingredients.iter().position(|i| i.id == member_ids[choice]) {
            set_default(ingredients, idx)?;
        }
    }

    Ok(())
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

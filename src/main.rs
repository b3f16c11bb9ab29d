use clap::Parser;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use grocery_planner_rs::cli::{Cli, Command, ExtraCommand};
use grocery_planner_rs::error::{PlannerError, Result};
use grocery_planner_rs::grocery::{existing_groups, suggest_groups, IndexMatcher};
use grocery_planner_rs::interface::{
    display_extras, display_grocery_list, display_meal_detail, display_meals,
    display_search_hits, prompt_meal_selection, prompt_multiplier, prompt_new_meal,
    prompt_substitute, prompt_yes_no, write_grocery_csv,
};
use grocery_planner_rs::models::IngredientIndex;
use grocery_planner_rs::state::{load_index, load_starters, load_state, save_state, AppState};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut state = load(&cli)?;
    let command = cli.command.unwrap_or_default();

    let changed = match command {
        Command::Meals => {
            display_meals(&state.data.all_meals(), &state.ui);
            false
        }
        Command::Show { meal } => cmd_show(&state, &meal)?,
        Command::AddMeal => cmd_add_meal(&mut state, &cli.index)?,
        Command::DeleteMeal { meal } => cmd_delete_meal(&mut state, &meal)?,
        Command::Select { meals, all, clear } => cmd_select(&mut state, &meals, all, clear)?,
        Command::Multiplier { meal, value } => cmd_multiplier(&mut state, &meal, value)?,
        Command::Substitute {
            meal,
            group,
            ingredient,
            reset,
        } => cmd_substitute(&mut state, &meal, &group, ingredient.as_deref(), reset)?,
        Command::ToggleIngredient { meal, ingredient } => {
            cmd_toggle_ingredient(&mut state, &meal, &ingredient)?
        }
        Command::Comment {
            meal,
            ingredient,
            text,
        } => cmd_comment(&mut state, &meal, &ingredient, &text)?,
        Command::Extra { action } => cmd_extra(&mut state, action)?,
        Command::Groceries { csv, json } => cmd_groceries(&state, &cli.index, csv.as_deref(), json)?,
        Command::Lookup { query, limit } => cmd_lookup(&cli.index, &query, limit),
        Command::Groups { partial } => cmd_groups(&state, partial.as_deref()),
        Command::Stores { add, remove } => cmd_stores(&mut state, add.as_deref(), remove.as_deref())?,
        Command::Categories { add, remove } => {
            cmd_categories(&mut state, add.as_deref(), remove.as_deref())?
        }
    };

    if changed {
        save_state(&cli.file, &state)?;
        debug!(path = %cli.file, "state written");
    }

    Ok(())
}

/// Load saved state and attach the starter meals, if any.
fn load(cli: &Cli) -> Result<AppState> {
    let mut state = load_state(Path::new(&cli.file))?;

    if let Some(path) = &cli.starters {
        let starters = load_starters(path)?;
        debug!(count = starters.len(), "starter meals loaded");
        state.data = std::mem::take(&mut state.data).with_starters(starters);
    }

    Ok(state)
}

fn index_from(path: &str) -> IngredientIndex {
    load_index(Path::new(path))
}

/// Show one meal in detail.
fn cmd_show(state: &AppState, meal: &str) -> Result<bool> {
    let meal_id = state.meal_id(meal)?;
    if let Some(meal) = state.data.find(&meal_id) {
        display_meal_detail(meal, &state.ui);
    }
    Ok(false)
}

/// Interactively create a meal and save it.
fn cmd_add_meal(state: &mut AppState, index_path: &str) -> Result<bool> {
    let index = index_from(index_path);
    let matcher = IndexMatcher::new(&index);

    let meal = prompt_new_meal(&state.data, &matcher)?;
    if meal.ingredients.is_empty() && !prompt_yes_no("Save a meal with no ingredients?", false)? {
        return Ok(false);
    }

    let saved = state.data.save_meal(meal);
    println!("Saved '{}' with {} ingredients.", saved.name, saved.ingredients.len());
    Ok(true)
}

/// Delete a user meal after confirmation.
fn cmd_delete_meal(state: &mut AppState, meal: &str) -> Result<bool> {
    let meal_id = state.meal_id(meal)?;
    let name = state
        .data
        .find(&meal_id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| meal_id.clone());

    if !prompt_yes_no(&format!("Delete '{}'?", name), false)? {
        return Ok(false);
    }

    state.delete_meal(&meal_id)?;
    println!("Deleted '{}'.", name);
    Ok(true)
}

/// Update the set of selected meals.
fn cmd_select(state: &mut AppState, meals: &[String], all: bool, clear: bool) -> Result<bool> {
    if clear {
        state.ui.clear_selection();
        println!("Selection cleared.");
        return Ok(true);
    }

    if all {
        let ids: Vec<String> = state.data.all_meals().iter().map(|m| m.id.clone()).collect();
        state.ui.select_all(ids.iter().map(String::as_str));
        println!("Selected all {} meals.", ids.len());
        return Ok(true);
    }

    if meals.is_empty() {
        let picked = prompt_meal_selection(&state.data.all_meals(), &state.ui)?;
        state.ui.clear_selection();
        state.ui.select_all(picked.iter().map(String::as_str));
        println!("{} meals selected.", picked.len());
        return Ok(true);
    }

    for query in meals {
        let meal_id = state.meal_id(query)?;
        let now = state.ui.toggle_meal(&meal_id);
        let name = state.data.find(&meal_id).map(|m| m.name.as_str()).unwrap_or(query);
        println!("{} {}", if now { "Selected" } else { "Unselected" }, name);
    }
    Ok(true)
}

/// Set a meal's multiplier.
fn cmd_multiplier(state: &mut AppState, meal: &str, value: Option<u32>) -> Result<bool> {
    let meal_id = state.meal_id(meal)?;
    let name = state
        .data
        .find(&meal_id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| meal_id.clone());

    let value = match value {
        Some(v) => v,
        None => prompt_multiplier(&name, state.ui.multiplier(&meal_id))?,
    };

    state.ui.set_multiplier(&meal_id, value)?;
    println!("{} x{}", name, value);
    Ok(true)
}

/// Choose, prompt for, or reset a substitute group member.
fn cmd_substitute(
    state: &mut AppState,
    meal: &str,
    group: &str,
    ingredient: Option<&str>,
    reset: bool,
) -> Result<bool> {
    let meal_id = state.meal_id(meal)?;

    if reset {
        state.ui.clear_substitute(&meal_id, group.trim());
        println!("'{}' back to its default.", group.trim());
        return Ok(true);
    }

    match ingredient {
        Some(ingredient) => state.choose_substitute(&meal_id, group, ingredient)?,
        None => {
            let meal = state
                .data
                .find(&meal_id)
                .ok_or_else(|| PlannerError::MealNotFound(meal_id.clone()))?;
            let overrides = state.ui.overrides_for(&meal_id).cloned().unwrap_or_default();
            let chosen = prompt_substitute(meal, group.trim(), &overrides)?;
            state.ui.choose_substitute(&meal_id, group.trim(), &chosen);
        }
    }

    println!("Substitute choice saved.");
    Ok(true)
}

/// Flip one ingredient's inclusion on the grocery list.
fn cmd_toggle_ingredient(state: &mut AppState, meal: &str, ingredient: &str) -> Result<bool> {
    let meal_id = state.meal_id(meal)?;
    let meal = state
        .data
        .find(&meal_id)
        .ok_or_else(|| PlannerError::MealNotFound(meal_id.clone()))?;
    let ing = state.ingredient_in(meal, ingredient)?;
    let (ing_id, ing_name) = (ing.id.clone(), ing.name.clone());

    let included = state.ui.toggle_ingredient(&meal_id, &ing_id);
    println!(
        "{} {}",
        ing_name,
        if included { "included" } else { "excluded" }
    );
    Ok(true)
}

/// Set or clear a note on one ingredient.
fn cmd_comment(state: &mut AppState, meal: &str, ingredient: &str, text: &str) -> Result<bool> {
    let meal_id = state.meal_id(meal)?;
    let meal = state
        .data
        .find(&meal_id)
        .ok_or_else(|| PlannerError::MealNotFound(meal_id.clone()))?;
    let ing_id = state.ingredient_in(meal, ingredient)?.id.clone();

    state.ui.set_comment(&meal_id, &ing_id, text);
    Ok(true)
}

fn cmd_extra(state: &mut AppState, action: ExtraCommand) -> Result<bool> {
    match action {
        ExtraCommand::Add { name, qty, store } => {
            let extra = state.ui.add_extra(&name, &qty, &store)?;
            println!("Added extra: {} ({})", extra.name, extra.qty);
            Ok(true)
        }
        ExtraCommand::Remove { item } => {
            let removed = state.ui.remove_extra(&item)?;
            println!("Removed extra: {}", removed.name);
            Ok(true)
        }
        ExtraCommand::List => {
            display_extras(&state.ui.extras);
            Ok(false)
        }
    }
}

/// Build and print the grocery list; optionally export it.
fn cmd_groceries(state: &AppState, index_path: &str, csv: Option<&str>, json: bool) -> Result<bool> {
    let index = index_from(index_path);
    let list = state.grocery_list(&IndexMatcher::new(&index));

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        display_grocery_list(&list, &state.data.stores());
    }

    if let Some(path) = csv {
        write_grocery_csv(&list, Path::new(path))?;
        println!("Wrote {} items to {}", list.item_count(), path);
    }

    Ok(false)
}

fn cmd_lookup(index_path: &str, query: &str, limit: usize) -> bool {
    let index = index_from(index_path);
    let matcher = IndexMatcher::new(&index);

    display_search_hits(query, &matcher.search(query, limit));
    if let Some(entry) = matcher.find_best_match(query) {
        println!();
        println!("Best match: {} -> {}", entry.description, entry.aisle);
    }
    false
}

fn cmd_groups(state: &AppState, partial: Option<&str>) -> bool {
    let groups = match partial {
        Some(p) => suggest_groups(state.data.all_meals(), p),
        None => existing_groups(state.data.all_meals()),
    };

    if groups.is_empty() {
        println!("No substitute groups.");
    }
    for group in groups {
        println!("  {}", group);
    }
    false
}

fn cmd_stores(state: &mut AppState, add: Option<&str>, remove: Option<&str>) -> Result<bool> {
    let mut changed = false;
    if let Some(name) = add {
        state.data.add_store(name)?;
        changed = true;
    }
    if let Some(name) = remove {
        state.data.remove_store(name)?;
        changed = true;
    }

    for store in state.data.stores() {
        match &store.store_home_url {
            Some(url) => println!("  {} ({})", store.name, url),
            None => println!("  {}", store.name),
        }
    }
    Ok(changed)
}

fn cmd_categories(state: &mut AppState, add: Option<&str>, remove: Option<&str>) -> Result<bool> {
    let mut changed = false;
    if let Some(name) = add {
        state.data.add_category(name)?;
        changed = true;
    }
    if let Some(name) = remove {
        state.data.remove_category(name)?;
        changed = true;
    }

    for category in state.data.categories() {
        println!("  {}", category);
    }
    Ok(changed)
}

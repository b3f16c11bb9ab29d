use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::grocery::{
    current_choice, resolve_active_ingredients, substitute_groups, GroceryList, SearchHit,
    SubstituteOverrides, OTHER_STORE,
};
use crate::models::{ExtraItem, Meal, Store, DELIVERY_SERVICES};
use crate::state::PlannerSelection;

/// Format a quantity without a trailing ".0" for whole numbers.
///
/// Up to two decimals are shown; tiny quantities keep one significant digit.
pub fn format_qty(qty: f64) -> String {
    if (qty - qty.round()).abs() < 1e-9 {
        return format!("{:.0}", qty);
    }

    let decimals = if qty.abs() < 0.01 {
        (-qty.abs().log10()).ceil().max(2.0) as usize
    } else {
        2
    };
    let s = format!("{:.*}", decimals, qty);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Shop and delivery links shown under a store heading.
///
/// The catch-all "Other" bucket gets none.
pub fn store_links(store_name: &str, stores: &[Store]) -> Vec<(String, String)> {
    if store_name == OTHER_STORE {
        return Vec::new();
    }

    let mut links = Vec::new();
    if let Some(url) = stores
        .iter()
        .find(|s| s.name == store_name)
        .and_then(|s| s.store_home_url.as_ref())
    {
        links.push(("Shop".to_string(), url.clone()));
    }
    for service in &DELIVERY_SERVICES {
        links.push((service.name.to_string(), service.store_search_url(store_name)));
    }
    links
}

/// Display the grocery list: store, then aisle, then items.
pub fn display_grocery_list(list: &GroceryList, stores: &[Store]) {
    if list.is_empty() {
        println!("Grocery list is empty. Select meals or add extra items first.");
        return;
    }

    println!();
    println!("=== Grocery List ({} items) ===", list.item_count());

    for store in list.store_names() {
        println!();
        println!("## {}", store);
        for (label, url) in store_links(store, stores) {
            println!("   {:<10} {}", format!("{}:", label), url);
        }

        let Some(aisles) = list.aisles(store) else {
            continue;
        };

        let width = aisles
            .values()
            .flatten()
            .map(|i| i.name.len())
            .max()
            .unwrap_or(10);

        for (aisle, items) in aisles {
            for item in items {
                // quantities of one are implied
                let qty_part = if item.qty > 1.0 {
                    format!(" ({} {})", format_qty(item.qty), item.unit)
                } else {
                    String::new()
                };
                let label = format!("{}{}", item.name, qty_part);
                let notes = if item.comments.is_empty() {
                    String::new()
                } else {
                    format!("  // {}", item.comments.join("; "))
                };
                println!(
                    "  [ ] {:<width$}  {}{}",
                    label,
                    aisle,
                    notes,
                    width = width + 12
                );
            }
        }
    }

    println!();
}

/// List meals grouped by category (both alphabetical), marking selections.
pub fn display_meals(meals: &[&Meal], selection: &PlannerSelection) {
    if meals.is_empty() {
        println!("No meals yet. Use 'add-meal' to create one.");
        return;
    }

    let mut by_category: BTreeMap<&str, Vec<&Meal>> = BTreeMap::new();
    for meal in meals {
        by_category
            .entry(meal.display_category())
            .or_default()
            .push(meal);
    }

    println!();
    for (category, mut list) in by_category {
        list.sort_by_key(|m| m.name.to_lowercase());
        println!("=== {} ===", category);
        for meal in list {
            let mark = if selection.is_selected(&meal.id) { "x" } else { " " };
            let mult = selection.multiplier(&meal.id);
            let mult_part = if mult > 1 {
                format!("  x{}", mult)
            } else {
                String::new()
            };
            println!(
                "  [{}] {} ({} ingredients){}",
                mark,
                meal.name,
                meal.ingredients.len(),
                mult_part
            );
        }
        println!();
    }
}

/// Show one meal with its substitute groups and the planner's choices.
pub fn display_meal_detail(meal: &Meal, selection: &PlannerSelection) {
    let no_overrides = SubstituteOverrides::new();
    let overrides = selection.overrides_for(&meal.id).unwrap_or(&no_overrides);

    println!();
    println!("=== {} [{}] ===", meal.name, meal.display_category());
    println!("id: {}", meal.id);
    if selection.is_selected(&meal.id) {
        println!("Selected, multiplier x{}", selection.multiplier(&meal.id));
    }
    println!();

    println!("Shopping for:");
    for ing in resolve_active_ingredients(meal, overrides) {
        let mark = if selection.is_included(&meal.id, &ing.id) { "x" } else { " " };
        let store = if ing.store.is_empty() { "-" } else { ing.store.as_str() };
        let note = selection
            .comment(&meal.id, &ing.id)
            .map(|c| format!("  // {}", c))
            .unwrap_or_default();
        println!(
            "  [{}] {} {} {}  @ {}{}",
            mark,
            format_qty(ing.qty),
            ing.unit,
            ing.name,
            store,
            note
        );
    }

    let groups = substitute_groups(meal);
    if groups.is_empty() {
        println!();
        return;
    }

    println!();
    println!("Substitute groups:");
    for group in &groups {
        let active_id = current_choice(meal, group.name, overrides).map(|i| i.id.as_str());
        println!("  {}:", group.name);
        for member in &group.members {
            let active = if Some(member.id.as_str()) == active_id { "*" } else { " " };
            let default = if member.is_default { " (default)" } else { "" };
            println!("    {} {}{}", active, member.name, default);
        }
    }
    println!();
}

/// Display the manual extra items with 1-based positions.
pub fn display_extras(extras: &[ExtraItem]) {
    if extras.is_empty() {
        println!("No extra items.");
        return;
    }

    println!();
    println!("=== Extra Items ({}) ===", extras.len());
    for (i, extra) in extras.iter().enumerate() {
        let store = if extra.store.is_empty() { "-" } else { extra.store.as_str() };
        println!(
            "{:>3}. {} {} {}  @ {}",
            i + 1,
            format_qty(extra.qty),
            extra.unit,
            extra.name,
            store
        );
    }
    println!();
}

/// Display reference index search hits.
pub fn display_search_hits(query: &str, hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No index entries match '{}'.", query);
        return;
    }

    for hit in hits {
        println!(
            "  {:<40} {:<16} [{}]",
            hit.entry.description, hit.entry.aisle, hit.key
        );
    }
}

/// Write the grocery list as CSV: store, aisle, item, qty, unit, comments.
pub fn write_grocery_csv(list: &GroceryList, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["store", "aisle", "item", "qty", "unit", "comments"])?;

    for (store, aisle, item) in list.iter() {
        wtr.write_record([
            store.to_string(),
            aisle.to_string(),
            item.name.clone(),
            format_qty(item.qty),
            item.unit.clone(),
            item.comments.join("; "),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::warn;

use crate::error::{PlannerError, Result};
use crate::models::ingredient::new_id;
use crate::models::{Ingredient, Meal};

/// User overrides for one meal: group name -> chosen ingredient id.
pub type SubstituteOverrides = HashMap<String, String>;

/// The members of one meal's substitute group, in recipe order.
#[derive(Debug, Clone)]
pub struct SubstituteGroup<'a> {
    pub name: &'a str,
    pub members: Vec<&'a Ingredient>,
    default: &'a Ingredient,
}

impl<'a> SubstituteGroup<'a> {
    /// Build a group from a non-empty member list.
    fn new(name: &'a str, first: &'a Ingredient, rest: Vec<&'a Ingredient>) -> Self {
        let mut members = Vec::with_capacity(rest.len() + 1);
        members.push(first);
        members.extend(rest);

        // First flagged member wins, however many are (incorrectly) flagged.
        let default = members.iter().copied().find(|i| i.is_default).unwrap_or(first);

        Self {
            name,
            members,
            default,
        }
    }

    /// First member flagged as default, else the first member.
    pub fn default_member(&self) -> &'a Ingredient {
        self.default
    }

    /// Override if it names a member of this group, else the default.
    pub fn active_member(&self, overrides: &SubstituteOverrides) -> &'a Ingredient {
        overrides
            .get(self.name)
            .and_then(|id| self.members.iter().find(|i| i.id == *id).copied())
            .unwrap_or_else(|| self.default_member())
    }

    pub fn is_trivial(&self) -> bool {
        self.members.len() == 1
    }
}

/// Split a meal's ingredients into ungrouped ones and substitute groups.
///
/// Groups come out in order of first appearance. Ingredients without an id
/// are dropped.
fn partition(meal: &Meal) -> (Vec<&Ingredient>, Vec<SubstituteGroup<'_>>) {
    let mut ungrouped = Vec::new();
    let mut buckets: IndexMap<&str, Vec<&Ingredient>> = IndexMap::new();

    for ing in &meal.ingredients {
        if ing.id.trim().is_empty() {
            warn!(meal_id = %meal.id, ingredient = %ing.name, "skipping ingredient without id");
            continue;
        }

        if ing.is_grouped() {
            buckets.entry(ing.group.as_str()).or_default().push(ing);
        } else {
            ungrouped.push(ing);
        }
    }

    let groups = buckets
        .into_iter()
        .filter_map(|(name, mut members)| {
            if members.is_empty() {
                return None;
            }
            let first = members.remove(0);
            Some(SubstituteGroup::new(name, first, members))
        })
        .collect();

    (ungrouped, groups)
}

/// All substitute groups of a meal.
pub fn substitute_groups(meal: &Meal) -> Vec<SubstituteGroup<'_>> {
    partition(meal).1
}

/// The ingredients a meal actually needs: every ungrouped ingredient in
/// recipe order, followed by exactly one member per substitute group.
///
/// Overrides only apply when they name a member of the same group of this
/// meal; anything else falls back to the group default.
pub fn resolve_active_ingredients<'a>(
    meal: &'a Meal,
    overrides: &SubstituteOverrides,
) -> Vec<&'a Ingredient> {
    let (mut result, groups) = partition(meal);
    result.extend(groups.iter().map(|g| g.active_member(overrides)));
    result
}

/// The currently active member of one named group, if the meal has it.
pub fn current_choice<'a>(
    meal: &'a Meal,
    group: &str,
    overrides: &SubstituteOverrides,
) -> Option<&'a Ingredient> {
    substitute_groups(meal)
        .into_iter()
        .find(|g| g.name == group)
        .map(|g| g.active_member(overrides))
}

/// Make the ingredient at `idx` its group's only default.
pub fn set_default(ingredients: &mut [Ingredient], idx: usize) -> Result<()> {
    let group = ingredients
        .get(idx)
        .ok_or_else(|| PlannerError::InvalidInput(format!("no ingredient at position {}", idx)))?
        .group
        .clone();

    if group.is_empty() {
        return Err(PlannerError::NotInGroup(ingredients[idx].name.clone()));
    }

    for (i, ing) in ingredients.iter_mut().enumerate() {
        if ing.group == group {
            ing.is_default = i == idx;
        }
    }

    Ok(())
}

/// Keep at most one default per group (the first flagged one) and clear the
/// flag on ungrouped ingredients.
pub fn repair_defaults(ingredients: &mut [Ingredient]) {
    let mut seen: HashSet<String> = HashSet::new();

    for ing in ingredients.iter_mut() {
        if !ing.is_default {
            continue;
        }
        if !ing.is_grouped() || !seen.insert(ing.group.clone()) {
            ing.is_default = false;
        }
    }
}

/// Every distinct group name used across the given meals, first seen first.
pub fn existing_groups<'a, I>(meals: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Meal>,
{
    let mut seen = HashSet::new();
    let mut groups = Vec::new();

    for meal in meals {
        for ing in &meal.ingredients {
            let name = ing.group.trim();
            if !name.is_empty() && seen.insert(name.to_string()) {
                groups.push(name.to_string());
            }
        }
    }

    groups
}

/// Existing group names containing `partial` (case-insensitive).
pub fn suggest_groups<'a, I>(meals: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a Meal>,
{
    let needle = partial.trim().to_lowercase();
    existing_groups(meals)
        .into_iter()
        .filter(|g| g.to_lowercase().contains(&needle))
        .collect()
}

/// An ingredient from any meal that belongs to a given group name.
#[derive(Debug, Clone, Copy)]
pub struct GroupOption<'a> {
    pub meal_id: &'a str,
    pub ingredient: &'a Ingredient,
}

/// All ingredients, across all meals, filed under `group`.
pub fn group_options<'a, I>(meals: I, group: &str) -> Vec<GroupOption<'a>>
where
    I: IntoIterator<Item = &'a Meal>,
{
    meals
        .into_iter()
        .flat_map(|meal| {
            meal.ingredients
                .iter()
                .filter(move |ing| ing.group == group)
                .map(move |ing| GroupOption {
                    meal_id: meal.id.as_str(),
                    ingredient: ing,
                })
        })
        .collect()
}

/// Copy an ingredient from another meal into a new instance for `group`.
///
/// Id and default flag are not carried over.
pub fn reuse_ingredient(template: &Ingredient, group: &str) -> Ingredient {
    Ingredient {
        id: new_id(),
        name: template.name.clone(),
        qty: template.qty,
        unit: template.unit.clone(),
        store: template.store.clone(),
        group: group.trim().to_string(),
        is_default: false,
    }
}

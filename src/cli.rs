use clap::{Parser, Subcommand};

/// GroceryPlanner: pick meals for the week and get one merged shopping list,
/// split by store and aisle.
#[derive(Parser, Debug)]
#[command(name = "grocery_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the planner state JSON file.
    #[arg(short, long, default_value = "planner_state.json")]
    pub file: String,

    /// Path to the reference ingredient index used for aisle lookup.
    #[arg(short, long, default_value = "ingredient_category_index.json")]
    pub index: String,

    /// Optional JSON array of read-only starter meals.
    #[arg(long)]
    pub starters: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List meals grouped by category.
    Meals,

    /// Show one meal with its substitute groups and planner choices.
    Show {
        /// Meal id or name.
        meal: String,
    },

    /// Interactively create a new meal.
    AddMeal,

    /// Delete a user meal.
    DeleteMeal {
        /// Meal id or name.
        meal: String,
    },

    /// Choose meals for the planning period (interactive without arguments).
    Select {
        /// Meal ids or names to toggle.
        meals: Vec<String>,

        /// Select every meal.
        #[arg(long, conflicts_with = "clear")]
        all: bool,

        /// Clear the selection.
        #[arg(long)]
        clear: bool,
    },

    /// Set how many times a meal is planned (interactive without a value).
    Multiplier {
        /// Meal id or name.
        meal: String,

        /// Repeat count, at least 1.
        value: Option<u32>,
    },

    /// Pick the member of a substitute group to shop for.
    Substitute {
        /// Meal id or name.
        meal: String,

        /// Substitute group name.
        group: String,

        /// Ingredient id or name (interactive when omitted).
        ingredient: Option<String>,

        /// Go back to the group default.
        #[arg(long, conflicts_with = "ingredient")]
        reset: bool,
    },

    /// Include or exclude one ingredient of a meal from the list.
    ToggleIngredient {
        /// Meal id or name.
        meal: String,

        /// Ingredient id or name.
        ingredient: String,
    },

    /// Attach a note to a meal's ingredient; an empty note clears it.
    Comment {
        /// Meal id or name.
        meal: String,

        /// Ingredient id or name.
        ingredient: String,

        /// Note text.
        #[arg(default_value = "")]
        text: String,
    },

    /// Manage extra items not tied to a meal.
    Extra {
        #[command(subcommand)]
        action: ExtraCommand,
    },

    /// Build the grocery list for the selected meals.
    Groceries {
        /// Also write the list as CSV.
        #[arg(long)]
        csv: Option<String>,

        /// Print the list as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Search the ingredient index.
    Lookup {
        /// Text to search for.
        query: String,

        /// Maximum number of hits.
        #[arg(short, long, default_value_t = 8)]
        limit: usize,
    },

    /// List substitute groups used across meals.
    Groups {
        /// Only groups containing this text.
        partial: Option<String>,
    },

    /// List or edit stores.
    Stores {
        /// Add a user store.
        #[arg(long)]
        add: Option<String>,

        /// Remove a user store.
        #[arg(long)]
        remove: Option<String>,
    },

    /// List or edit meal categories.
    Categories {
        /// Add a user category.
        #[arg(long)]
        add: Option<String>,

        /// Remove a user category.
        #[arg(long)]
        remove: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExtraCommand {
    /// Add an extra item.
    Add {
        /// Item name.
        name: String,

        /// Quantity; anything that is not a positive number becomes 1.
        #[arg(short, long, default_value = "1")]
        qty: String,

        /// Store to buy it at.
        #[arg(short, long, default_value = "")]
        store: String,
    },

    /// Remove an extra by id or list position.
    Remove {
        item: String,
    },

    /// List extra items.
    List,
}

impl Default for Command {
    fn default() -> Self {
        Command::Groceries {
            csv: None,
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["grocery_planner"]);
        assert_eq!(cli.file, "planner_state.json");
        assert_eq!(cli.index, "ingredient_category_index.json");
        assert!(cli.starters.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_substitute_args() {
        let cli = Cli::parse_from(["grocery_planner", "substitute", "Tacos", "protein", "Chicken"]);
        match cli.command {
            Some(Command::Substitute {
                meal,
                group,
                ingredient,
                reset,
            }) => {
                assert_eq!(meal, "Tacos");
                assert_eq!(group, "protein");
                assert_eq!(ingredient.as_deref(), Some("Chicken"));
                assert!(!reset);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_extra_add_args() {
        let cli = Cli::parse_from(["grocery_planner", "extra", "add", "Foil", "--qty", "2"]);
        match cli.command {
            Some(Command::Extra {
                action: ExtraCommand::Add { name, qty, store },
            }) => {
                assert_eq!(name, "Foil");
                assert_eq!(qty, "2");
                assert_eq!(store, "");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}

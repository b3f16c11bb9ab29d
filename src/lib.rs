pub mod cli;
pub mod error;
pub mod grocery;
pub mod interface;
pub mod models;
pub mod state;

pub use error::{PlannerError, Result};
pub use models::{ExtraItem, Ingredient, Meal};

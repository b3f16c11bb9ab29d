mod app;
mod library;
mod persistence;
mod selection;

pub use app::{AppState, CURRENT_SCHEMA_VERSION};
pub use library::MealLibrary;
pub use persistence::{load_index, load_starters, load_state, migrate, save_state};
pub use selection::PlannerSelection;

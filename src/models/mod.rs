pub mod index;
pub mod ingredient;
pub mod meal;
pub mod store;

pub use index::{AisleDebug, IndexEntry, IngredientIndex};
pub use ingredient::{ExtraItem, Ingredient, RawIngredient};
pub use meal::{Meal, RawMeal, GLOBAL_CATEGORIES};
pub use store::{global_stores, DeliveryService, Store, DELIVERY_SERVICES};

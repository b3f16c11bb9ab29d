use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Meal not found: {0}")]
    MealNotFound(String),

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Starter meal cannot be modified or deleted: {0}")]
    ImmutableMeal(String),

    #[error("Ingredient '{0}' is not part of a substitute group")]
    NotInGroup(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

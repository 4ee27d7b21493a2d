//! Business layer between handlers and the persistence stores.

pub mod recipes;

pub use recipes::RecipeService;

//! Request validation for recipe writes.
//!
//! Field-level bounds are declared with `validator` derives on the request
//! DTOs; this module adds the rules a derive cannot express (blank strings,
//! the ingredient food reference) and walks the nested lists. Everything
//! here runs before the persistence service is contacted.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::recipe::{CreateRecipe, IngredientInput, StepInput, UpdateRecipe};

// ---------------------------------------------------------------------------
// Single items
// ---------------------------------------------------------------------------

/// Validate one ingredient.
///
/// Rules:
/// - `alimentId` is present, or `alimentNom` is present and not blank.
/// - `quantite`, if present, is strictly positive.
pub fn validate_ingredient(ingredient: &IngredientInput) -> Result<(), CoreError> {
    if !has_food_reference(ingredient) {
        return Err(CoreError::Validation(
            "Each ingredient needs a food id or a food name".to_string(),
        ));
    }
    ingredient
        .validate()
        .map_err(|e| CoreError::Validation(describe(&e)))
}

/// Whether the ingredient names a food by id or by non-blank free text.
pub fn has_food_reference(ingredient: &IngredientInput) -> bool {
    ingredient.aliment_id.is_some()
        || ingredient
            .aliment_nom
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
}

/// Validate one preparation step.
///
/// Rules:
/// - `ordre` is present and greater than 0.
/// - `texte` is present, not blank, and 5 to 1000 characters long.
/// - `temps`, if present, is not negative.
pub fn validate_step(step: &StepInput) -> Result<(), CoreError> {
    match step.ordre {
        Some(ordre) if ordre > 0 => {}
        _ => {
            return Err(CoreError::Validation(
                "Each step order must be greater than 0".to_string(),
            ))
        }
    }
    if step.texte.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Each step needs a non-blank text".to_string(),
        ));
    }
    step.validate()
        .map_err(|e| CoreError::Validation(describe(&e)))
}

/// Validate a rejection reason and return it trimmed.
pub fn validate_rejection_reason(motif: Option<&str>) -> Result<&str, CoreError> {
    match motif.map(str::trim) {
        Some(m) if !m.is_empty() => Ok(m),
        _ => Err(CoreError::Validation(
            "A rejection reason is required".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Whole requests
// ---------------------------------------------------------------------------

/// Validate a create payload, including every ingredient and step.
pub fn validate_create(request: &CreateRecipe) -> Result<(), CoreError> {
    if request.titre.as_deref().is_none_or(|t| t.trim().is_empty()) {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    request
        .validate()
        .map_err(|e| CoreError::Validation(describe(&e)))?;
    validate_lists(request.ingredients.as_deref(), request.etapes.as_deref())
}

/// Validate an update payload. Absent fields are left untouched downstream,
/// so only present values are checked.
pub fn validate_update(request: &UpdateRecipe) -> Result<(), CoreError> {
    if request.titre.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(CoreError::Validation("Title must not be blank".to_string()));
    }
    request
        .validate()
        .map_err(|e| CoreError::Validation(describe(&e)))?;
    validate_lists(request.ingredients.as_deref(), request.etapes.as_deref())
}

fn validate_lists(
    ingredients: Option<&[IngredientInput]>,
    steps: Option<&[StepInput]>,
) -> Result<(), CoreError> {
    for (i, ingredient) in ingredients.unwrap_or_default().iter().enumerate() {
        validate_ingredient(ingredient).map_err(|e| prefix(e, "ingredients", i))?;
    }
    for (i, step) in steps.unwrap_or_default().iter().enumerate() {
        validate_step(step).map_err(|e| prefix(e, "etapes", i))?;
    }
    Ok(())
}

fn prefix(err: CoreError, list: &str, index: usize) -> CoreError {
    match err {
        CoreError::Validation(msg) => CoreError::Validation(format!("{list}[{index}]: {msg}")),
        other => other,
    }
}

/// Flatten `validator` field errors into one deterministic message,
/// e.g. `kcal: Calories must be between 0 and 10000; titre: ...`.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

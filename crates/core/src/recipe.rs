//! Recipe DTOs exchanged with clients and with the persistence service.
//!
//! Field names mirror the persistence service's camelCase JSON
//! (`tempsTotal`, `noteMoyenne`, ...) so payloads can be forwarded without a
//! mapping layer. Response types keep `null` fields on output; request types
//! omit them, as the persistence service expects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Recipe difficulty. Ordered from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "FACILE")]
    Easy,
    #[serde(rename = "MOYEN")]
    Medium,
    #[serde(rename = "DIFFICILE")]
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "FACILE",
            Difficulty::Medium => "MOYEN",
            Difficulty::Hard => "DIFFICILE",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FACILE" => Ok(Difficulty::Easy),
            "MOYEN" => Ok(Difficulty::Medium),
            "DIFFICILE" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty '{other}'")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Moderation status. Transitions are enforced by the persistence service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecipeStatus {
    #[serde(rename = "EN_ATTENTE")]
    Pending,
    #[serde(rename = "VALIDEE")]
    Validated,
    #[serde(rename = "REJETEE")]
    Rejected,
}

impl RecipeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeStatus::Pending => "EN_ATTENTE",
            RecipeStatus::Validated => "VALIDEE",
            RecipeStatus::Rejected => "REJETEE",
        }
    }

    /// Path segment of the persistence service's per-status listing.
    pub fn path_segment(&self) -> &'static str {
        match self {
            RecipeStatus::Pending => "en-attente",
            RecipeStatus::Validated => "validees",
            RecipeStatus::Rejected => "rejetees",
        }
    }
}

impl fmt::Display for RecipeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement unit accepted on ingredient input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "GRAMME")]
    Gram,
    #[serde(rename = "KILOGRAMME")]
    Kilogram,
    #[serde(rename = "LITRE")]
    Litre,
    #[serde(rename = "MILLILITRE")]
    Millilitre,
    #[serde(rename = "CUILLERE_A_SOUPE")]
    Tablespoon,
    #[serde(rename = "CUILLERE_A_CAFE")]
    Teaspoon,
    #[serde(rename = "SACHET")]
    Sachet,
    #[serde(rename = "UNITE")]
    Unit,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A recipe as returned by the persistence service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default)]
    pub id: DbId,
    pub titre: Option<String>,
    pub description: Option<String>,
    pub temps_total: Option<i32>,
    pub kcal: Option<i32>,
    pub image_url: Option<String>,
    /// Kept as a string: older rows may carry values outside [`Difficulty`].
    pub difficulte: Option<String>,
    pub categorie: Option<String>,
    pub date_creation: Option<Timestamp>,
    pub date_modification: Option<Timestamp>,
    pub actif: Option<bool>,
    pub statut: Option<RecipeStatus>,
    pub motif_rejet: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<IngredientLine>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub etapes: Vec<Step>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub note_moyenne: Option<f64>,
    pub nombre_feedbacks: Option<i32>,
    pub utilisateur_id: Option<DbId>,
}

/// One ingredient line of a stored recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLine {
    pub id: Option<DbId>,
    pub aliment_id: Option<DbId>,
    pub aliment_nom: Option<String>,
    pub quantite: Option<f32>,
    pub unite: Option<String>,
    pub principal: Option<bool>,
}

/// One preparation step of a stored recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: Option<DbId>,
    pub ordre: Option<i32>,
    /// Estimated minutes.
    pub temps: Option<i32>,
    pub texte: Option<String>,
}

/// Aggregated feedback figures for one recipe.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStats {
    pub recette_id: Option<DbId>,
    pub titre: Option<String>,
    pub note_moyenne: Option<f64>,
    pub nombre_feedbacks: Option<i32>,
    pub nombre_vues: Option<i32>,
    pub nombre_favoris: Option<i32>,
    pub distribution_notes: Option<RatingDistribution>,
}

/// Number of ratings per star value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingDistribution {
    #[serde(rename = "note1")]
    pub one: Option<i32>,
    #[serde(rename = "note2")]
    pub two: Option<i32>,
    #[serde(rename = "note3")]
    pub three: Option<i32>,
    #[serde(rename = "note4")]
    pub four: Option<i32>,
    #[serde(rename = "note5")]
    pub five: Option<i32>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Payload for `POST /api/recettes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipe {
    #[validate(
        required(message = "Title is required"),
        length(min = 3, max = 200, message = "Title must be between 3 and 200 characters")
    )]
    pub titre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 1440, message = "Total time must be between 1 and 1440 minutes"))]
    pub temps_total: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 10000, message = "Calories must be between 0 and 10000"))]
    pub kcal: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Image URL must not exceed 500 characters"))]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulte: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<IngredientInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etapes: Option<Vec<StepInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilisateur_id: Option<DbId>,
}

/// Payload for `PUT /api/recettes/{id}`. Present lists replace the stored ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipe {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub titre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 1440, message = "Total time must be between 1 and 1440 minutes"))]
    pub temps_total: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 10000, message = "Calories must be between 0 and 10000"))]
    pub kcal: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Image URL must not exceed 500 characters"))]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulte: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<IngredientInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etapes: Option<Vec<StepInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actif: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statut: Option<RecipeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Rejection reason must not exceed 500 characters"))]
    pub motif_rejet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilisateur_id: Option<DbId>,
}

/// Ingredient on a create/update payload. Either `alimentId` or a non-blank
/// `alimentNom` must be given; see [`crate::validation::validate_ingredient`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliment_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliment_nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be greater than 0"))]
    pub quantite: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unite: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<bool>,
}

/// Preparation step on a create/update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    #[validate(
        required(message = "Step order is required"),
        range(min = 1, message = "Step order must be greater than 0")
    )]
    pub ordre: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Step time must not be negative"))]
    pub temps: Option<i32>,
    #[validate(
        required(message = "Step text is required"),
        length(min = 5, max = 1000, message = "Step text must be between 5 and 1000 characters")
    )]
    pub texte: Option<String>,
}

/// Body of `POST /api/recettes/search`. Every criterion is optional; present
/// criteria are combined with AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulte_max: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, message = "Maximum time must be greater than 0"))]
    pub temps_max: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Maximum calories must not be negative"))]
    pub kcal_max: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients_inclus: Option<Vec<DbId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients_exclus: Option<Vec<DbId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1.0, max = 5.0, message = "Minimum rating must be between 1.0 and 5.0"))]
    pub note_moyenne_min: Option<f64>,
}

impl SearchCriteria {
    /// Criteria matching a single category, as sent downstream for
    /// category listings.
    pub fn for_category(categorie: impl Into<String>) -> Self {
        Self {
            categorie: Some(categorie.into()),
            ..Self::default()
        }
    }
}

/// Body of `PUT /api/recettes/{id}/rejeter`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectionRequest {
    pub motif: Option<String>,
}

/// Java serializers emit `null` for empty collections; treat it as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

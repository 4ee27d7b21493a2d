use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the most common not-found case.
    pub fn recipe_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Recette",
            id,
        }
    }

    pub fn file_not_found(id: DbId) -> Self {
        CoreError::NotFound {
            entity: "Fichier",
            id,
        }
    }
}

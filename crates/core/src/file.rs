//! File attachments (images and documents) stored alongside a recipe.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Metadata of a stored attachment.
///
/// The persistence service names three fields differently (`nomStocke`,
/// `cheminMinio`, `dateUpload`); those names are accepted on input and the
/// gateway always emits its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeFile {
    pub id: Option<DbId>,
    pub recette_id: Option<DbId>,
    pub nom_original: Option<String>,
    #[serde(alias = "nomStocke")]
    pub nom_stockage: Option<String>,
    pub content_type: Option<String>,
    pub taille: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(alias = "cheminMinio")]
    pub url: Option<String>,
    #[serde(alias = "dateUpload")]
    pub date_creation: Option<Timestamp>,
}

/// Attachment category; selects the upload/list sub-path downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    Image,
    Document,
}

impl FileKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            FileKind::Image => "images",
            FileKind::Document => "documents",
        }
    }
}

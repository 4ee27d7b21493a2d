//! Client for the MS-Persistance REST service.
//!
//! The gateway never stores recipes itself; every read and write goes
//! through the [`RecipeStore`] and [`FileStore`] traits, which
//! [`PersistanceClient`] implements over HTTP.

pub mod client;
pub mod error;
pub mod store;

pub use client::PersistanceClient;
pub use error::PersistanceError;
pub use store::{FileContent, FileStore, FileUpload, RecipeStore};

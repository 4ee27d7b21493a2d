//! MS-Recette API server library.
//!
//! Exposes the building blocks (config, state, error handling, cache, recipe
//! service, offload pool, routes) so integration tests and the binary
//! entrypoint can both access them.

pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod offload;
pub mod query;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;

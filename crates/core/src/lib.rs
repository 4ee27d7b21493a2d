//! Domain types and pure logic for the recipe gateway.
//!
//! Holds the wire DTOs shared with the persistence service, request
//! validation, and the in-process search / ranking helpers. This crate does
//! no I/O so it can be exercised directly by unit tests.

pub mod error;
pub mod file;
pub mod recipe;
pub mod search;
pub mod types;
pub mod validation;

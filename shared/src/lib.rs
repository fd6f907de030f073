//! Shared types, models and the planning engine for the Reorder Planning service
//!
//! This crate contains the synchronous planning engine together with the types
//! shared between the backend, the WASM calculator and other components.

pub mod models;
pub mod planning;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;

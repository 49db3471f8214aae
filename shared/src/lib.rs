//! Shared types and advisory models for the Smart Kisaan platform
//!
//! This crate contains the request records, validation rules and prompt
//! builders shared between the backend and the browser (via WASM).

pub mod advisory;
pub mod fields;
pub mod models;
pub mod prompts;
pub mod types;
pub mod validation;

pub use advisory::{Advisory, Feature};
pub use models::*;
pub use types::*;
pub use validation::ValidationError;

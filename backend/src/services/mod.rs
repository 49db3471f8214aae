//! Business logic services for the Smart Kisaan backend

pub mod advisory;
pub mod auth;
pub mod normalizer;

pub use advisory::AdvisoryService;
pub use auth::AuthService;

//! HTTP handlers

pub mod advisory;
pub mod auth;
pub mod health;

pub use advisory::advise;
pub use auth::*;
pub use health::{health_check, root, route_not_found};

use serde::Serialize;

/// Success envelope: `{success: true, data}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

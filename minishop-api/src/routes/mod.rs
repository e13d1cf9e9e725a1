/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and logout
/// - `users`: User sign-up
/// - `products`: Product catalog CRUD
/// - `cart`: Per-user shopping cart

pub mod auth;
pub mod cart;
pub mod health;
pub mod products;
pub mod users;

use serde::{Deserialize, Serialize};

/// Body of responses that only carry a human-readable outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//! # Minishop Shared Library
//!
//! Domain access and authentication primitives used by the Minishop API
//! server.
//!
//! ## Module Organization
//!
//! - `db`: SQLite pool and migrations
//! - `models`: Users, products and cart items with their CRUD operations
//! - `auth`: Password hashing and the session store

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Minishop shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

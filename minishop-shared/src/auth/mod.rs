/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: server-side session store keyed by cookie tokens

pub mod password;
pub mod session;

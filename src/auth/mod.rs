//! Authentication module for DataShare.
//!
//! Provides password hashing and validation. Token issuance and
//! verification live in the web layer (`web::middleware::auth`).

mod password;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};

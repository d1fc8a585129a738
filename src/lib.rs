//! DataShare - Authenticated file sharing service
//!
//! A REST API for uploading files behind email/password accounts. Each
//! upload gets a public share token and an expiry clamped to at most a
//! week; owners can delete their files by token.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{DataShareError, Result};
pub use file::{
    resolve_expiry, FileRecord, FileRepository, FileService, FileStorage, NewFileRecord,
    UploadPolicy, UploadRequest,
};
pub use web::WebServer;

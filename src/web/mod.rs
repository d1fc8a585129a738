//! Web API module for DataShare.
//!
//! This module provides the REST API: registration and login, bearer-token
//! authenticated file upload and deletion, a health check and Swagger UI.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;

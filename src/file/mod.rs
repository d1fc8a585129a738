//! File lifecycle module for DataShare.
//!
//! This module provides the core of the service:
//! - Upload validation and expiry policy (pure, no I/O)
//! - Physical blob storage with UUID naming
//! - File record persistence keyed by a public share token
//! - Lifecycle orchestration (upload, ownership-checked delete)

mod policy;
mod record;
mod service;
mod storage;

pub use policy::{resolve_expiry, UploadPolicy, MAX_RETENTION_DAYS, MIN_RETENTION_DAYS};
pub use record::{FileRecord, FileRepository, NewFileRecord};
pub use service::{DeleteResult, FileService, UploadRequest, UploadResult};
pub use storage::FileStorage;

//! File lifecycle service for DataShare.
//!
//! Orchestrates uploads and deletions across the validation policy, the
//! blob store and the record repository. Handlers call in here; nothing
//! below this layer knows about HTTP.

use chrono::{DateTime, Utc};

use super::policy::{resolve_expiry, UploadPolicy};
use super::record::{FileRepository, NewFileRecord};
use super::storage::FileStorage;
use crate::db::Database;
use crate::{DataShareError, Result};

/// An upload request, already extracted from the transport layer.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original filename.
    pub original_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// File content.
    pub content: Vec<u8>,
    /// Requested expiry as an RFC 3339 timestamp, if any.
    pub expires_at: Option<String>,
    /// Optional password to associate with the file.
    pub file_password: Option<String>,
}

impl UploadRequest {
    /// Create an upload request with the required fields.
    pub fn new(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            content,
            expires_at: None,
            file_password: None,
        }
    }

    /// Set the requested expiry timestamp.
    pub fn with_expires_at(mut self, expires_at: impl Into<String>) -> Self {
        self.expires_at = Some(expires_at.into());
        self
    }

    /// Set the file password.
    pub fn with_file_password(mut self, password: impl Into<String>) -> Self {
        self.file_password = Some(password.into());
        self
    }
}

/// Outcome of a successful upload. Safe to serialize for clients.
#[derive(Debug, Clone)]
pub struct UploadResult {
    /// Public share token.
    pub token: String,
    /// Effective expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Original filename.
    pub original_name: String,
    /// Stored size in bytes.
    pub size: i64,
}

/// Outcome of a successful deletion.
#[derive(Debug, Clone)]
pub struct DeleteResult {
    /// Original filename of the removed file.
    pub original_name: String,
}

/// Service coordinating the file lifecycle.
pub struct FileService<'a> {
    db: &'a Database,
    storage: &'a FileStorage,
    policy: &'a UploadPolicy,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(db: &'a Database, storage: &'a FileStorage, policy: &'a UploadPolicy) -> Self {
        Self {
            db,
            storage,
            policy,
        }
    }

    /// Store an uploaded file for the given user.
    ///
    /// Validation runs before any I/O; a rejected upload leaves neither
    /// a blob nor a record behind. The expiry is resolved against the
    /// current time, so the result never expires sooner than a day out.
    pub async fn upload(&self, request: UploadRequest, user_id: i64) -> Result<UploadResult> {
        self.policy.validate(
            &request.original_name,
            &request.mime_type,
            request.content.len() as u64,
        )?;

        let expires_at = resolve_expiry(Utc::now(), request.expires_at.as_deref());

        let stored_name = self.storage.save(&request.content, &request.original_name)?;

        let mut new_record = NewFileRecord::new(
            &request.original_name,
            &request.mime_type,
            request.content.len() as i64,
            &stored_name,
            expires_at,
            user_id,
        );
        if let Some(password) = request.file_password {
            new_record = new_record.with_file_password(password);
        }

        let repo = FileRepository::new(self.db.pool());
        let record = match repo.create(&new_record).await {
            Ok(record) => record,
            Err(e) => {
                // The blob must not outlive a failed insert
                if let Err(cleanup) = self.storage.remove(&stored_name) {
                    tracing::warn!(
                        stored_name = %stored_name,
                        error = %cleanup,
                        "Failed to remove blob after insert failure"
                    );
                }
                return Err(e);
            }
        };

        tracing::info!(
            file_id = record.id,
            user_id,
            size = record.size,
            "File uploaded"
        );

        Ok(UploadResult {
            token: record.token,
            expires_at: record.expires_at,
            original_name: record.original_name,
            size: record.size,
        })
    }

    /// Delete a file by share token on behalf of the given user.
    ///
    /// The ownership check happens before any mutation. The record is
    /// removed first; blob removal is best-effort, since an orphaned
    /// blob is recoverable while a dangling record is not.
    pub async fn delete(&self, token: &str, user_id: i64) -> Result<DeleteResult> {
        let repo = FileRepository::new(self.db.pool());

        let record = repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| DataShareError::NotFound("file".to_string()))?;

        if record.user_id != user_id {
            return Err(DataShareError::Permission(
                "you do not have permission to delete this file".to_string(),
            ));
        }

        repo.delete_by_token(token).await?;

        match self.storage.remove(&record.storage_path) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    file_id = record.id,
                    storage_path = %record.storage_path,
                    "Blob already missing during delete"
                );
            }
            Err(e) => {
                tracing::warn!(
                    file_id = record.id,
                    storage_path = %record.storage_path,
                    error = %e,
                    "Failed to remove blob during delete"
                );
            }
        }

        tracing::info!(file_id = record.id, user_id, "File deleted");

        Ok(DeleteResult {
            original_name: record.original_name,
        })
    }
}

//! File record model and repository for DataShare.
//!
//! Each uploaded file gets one row keyed by a randomly generated share
//! token. The token is the only handle ever given out; the storage path
//! stays server-side.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::DbPool;
use crate::{DataShareError, Result};

/// File entity representing an uploaded file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique file ID.
    pub id: i64,
    /// Public share token.
    pub token: String,
    /// Original filename as supplied by the uploader.
    pub original_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub size: i64,
    /// Relative path of the blob within the storage root.
    pub storage_path: String,
    /// Instant after which the file is considered expired.
    pub expires_at: DateTime<Utc>,
    /// Owning user ID.
    pub user_id: i64,
    /// Optional password associated with the file (stored as-is).
    pub file_password: Option<String>,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Original filename.
    pub original_name: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub size: i64,
    /// Relative path of the stored blob.
    pub storage_path: String,
    /// Effective expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Owning user ID.
    pub user_id: i64,
    /// Optional file password.
    pub file_password: Option<String>,
}

impl NewFileRecord {
    /// Create a new file record.
    pub fn new(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        size: i64,
        storage_path: impl Into<String>,
        expires_at: DateTime<Utc>,
        user_id: i64,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            size,
            storage_path: storage_path.into(),
            expires_at,
            user_id,
            file_password: None,
        }
    }

    /// Set an optional file password.
    pub fn with_file_password(mut self, password: impl Into<String>) -> Self {
        self.file_password = Some(password.into());
        self
    }
}

/// Repository for file record operations.
pub struct FileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new file record with a freshly generated share token.
    ///
    /// Returns the created record including token and assigned ID.
    pub async fn create(&self, new_file: &NewFileRecord) -> Result<FileRecord> {
        let token = Uuid::new_v4().to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO files
                (token, original_name, mime_type, size, storage_path,
                 expires_at, user_id, file_password)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&token)
        .bind(&new_file.original_name)
        .bind(&new_file.mime_type)
        .bind(new_file.size)
        .bind(&new_file.storage_path)
        .bind(new_file.expires_at)
        .bind(new_file.user_id)
        .bind(&new_file.file_password)
        .execute(self.pool)
        .await
        .map_err(|e| DataShareError::Database(e.to_string()))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DataShareError::NotFound("file".to_string()))
    }

    /// Get a file record by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let result = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, token, original_name, mime_type, size, storage_path,
                   expires_at, user_id, file_password, created_at
            FROM files WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DataShareError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Find a file record by its share token.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<FileRecord>> {
        let result = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, token, original_name, mime_type, size, storage_path,
                   expires_at, user_id, file_password, created_at
            FROM files WHERE token = ?
            "#,
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DataShareError::Database(e.to_string()))?;

        Ok(result)
    }

    /// Delete a file record by its share token.
    ///
    /// Returns true if a record was deleted.
    pub async fn delete_by_token(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE token = ?")
            .bind(token)
            .execute(self.pool)
            .await
            .map_err(|e| DataShareError::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, NewUser, UserRepository};
    use chrono::Duration;

    async fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserRepository::new(db.pool())
            .create(&NewUser::new("owner@example.com", "hash"))
            .await
            .unwrap();
        (db, user.id)
    }

    fn sample(user_id: i64) -> NewFileRecord {
        NewFileRecord::new(
            "report.pdf",
            "application/pdf",
            1024,
            "ab/abcd.pdf",
            Utc::now() + Duration::days(7),
            user_id,
        )
    }

    #[tokio::test]
    async fn test_create_assigns_token() {
        let (db, user_id) = setup().await;
        let repo = FileRepository::new(db.pool());

        let record = repo.create(&sample(user_id)).await.unwrap();

        assert!(record.id > 0);
        assert!(!record.token.is_empty());
        assert_eq!(record.original_name, "report.pdf");
        assert_eq!(record.size, 1024);
        assert_eq!(record.user_id, user_id);
        assert!(record.file_password.is_none());
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let (db, user_id) = setup().await;
        let repo = FileRepository::new(db.pool());

        let a = repo.create(&sample(user_id)).await.unwrap();
        let b = repo.create(&sample(user_id)).await.unwrap();

        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn test_find_by_token() {
        let (db, user_id) = setup().await;
        let repo = FileRepository::new(db.pool());

        let created = repo.create(&sample(user_id)).await.unwrap();

        let found = repo.find_by_token(&created.token).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.storage_path, "ab/abcd.pdf");

        let missing = repo.find_by_token("no-such-token").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_by_token() {
        let (db, user_id) = setup().await;
        let repo = FileRepository::new(db.pool());

        let created = repo.create(&sample(user_id)).await.unwrap();

        assert!(repo.delete_by_token(&created.token).await.unwrap());
        assert!(repo.find_by_token(&created.token).await.unwrap().is_none());

        // Second delete is a no-op
        assert!(!repo.delete_by_token(&created.token).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_leaves_other_files_alone() {
        let (db, user_id) = setup().await;
        let repo = FileRepository::new(db.pool());

        let kept = repo.create(&sample(user_id)).await.unwrap();
        let removed = repo.create(&sample(user_id)).await.unwrap();

        assert!(repo.delete_by_token(&removed.token).await.unwrap());
        assert!(repo.find_by_token(&kept.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_password_stored() {
        let (db, user_id) = setup().await;
        let repo = FileRepository::new(db.pool());

        let record = repo
            .create(&sample(user_id).with_file_password("secret"))
            .await
            .unwrap();

        let found = repo.find_by_token(&record.token).await.unwrap().unwrap();
        assert_eq!(found.file_password.as_deref(), Some("secret"));
    }

}

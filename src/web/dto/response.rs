//! Response DTOs for the Web API.
//!
//! These types define everything a client can ever see. Internal fields
//! (record IDs, storage paths, owner IDs, file passwords) have no place
//! here.

use serde::Serialize;
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Authentication response (register and login).
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Access token (JWT).
    pub access_token: String,
    /// Access token expiry in seconds.
    pub expires_in: u64,
}

/// File upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileUploadResponse {
    /// Public share token for the uploaded file.
    pub token: String,
    /// Original filename.
    pub original_name: String,
    /// Stored size in bytes.
    pub size: i64,
    /// Expiry timestamp (RFC 3339).
    pub expires_at: String,
}

/// File deletion response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileDeleteResponse {
    /// Original filename of the removed file.
    pub original_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_envelope() {
        let response = ApiResponse::new(AuthResponse {
            access_token: "token".to_string(),
            expires_in: 3600,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"]["access_token"], "token");
        assert_eq!(json["data"]["expires_in"], 3600);
    }

    #[test]
    fn test_upload_response_exposes_only_public_fields() {
        let response = FileUploadResponse {
            token: "abc".to_string(),
            original_name: "test.pdf".to_string(),
            size: 1024,
            expires_at: "2026-09-05T00:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        let obj = json.as_object().unwrap();

        for key in ["token", "original_name", "size", "expires_at"] {
            assert!(obj.contains_key(key), "{key} missing from response");
        }
        assert_eq!(obj.len(), 4);
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("user_id"));
        assert!(!obj.contains_key("storage_path"));
        assert!(!obj.contains_key("file_password"));
    }
}

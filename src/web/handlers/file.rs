//! File handlers for the Web API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;

use crate::file::{FileService, UploadRequest};
use crate::web::dto::{ApiResponse, FileDeleteResponse, FileUploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/files/upload - Upload a file and receive a share token.
///
/// Request body: multipart/form-data with a required "file" field and
/// optional "expires_at" (RFC 3339) and "file_password" text fields.
#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "files",
    responses(
        (status = 200, description = "File uploaded", body = FileUploadResponse),
        (status = 400, description = "Missing file field or invalid multipart data"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "File rejected by upload policy")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<FileUploadResponse>>, ApiError> {
    let mut filename: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;
    let mut expires_at: Option<String> = None;
    let mut file_password: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                mime_type = field.content_type().map(|s| s.to_string());
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            tracing::error!("Failed to read file content: {}", e);
                            ApiError::bad_request("Failed to read file")
                        })?
                        .to_vec(),
                );
            }
            "expires_at" => {
                expires_at = Some(field.text().await.map_err(|e| {
                    tracing::error!("Failed to read expires_at field: {}", e);
                    ApiError::bad_request("Invalid expires_at field")
                })?);
            }
            "file_password" => {
                file_password = Some(field.text().await.map_err(|e| {
                    tracing::error!("Failed to read file_password field: {}", e);
                    ApiError::bad_request("Invalid file_password field")
                })?);
            }
            _ => {}
        }
    }

    let filename = filename.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let content = content.ok_or_else(|| ApiError::bad_request("No file content"))?;
    let mime_type = mime_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let mut request = UploadRequest::new(filename, mime_type, content);
    if let Some(expires_at) = expires_at {
        request = request.with_expires_at(expires_at);
    }
    if let Some(password) = file_password {
        request = request.with_file_password(password);
    }

    let service = FileService::new(&state.db, &state.storage, &state.policy);
    let result = service.upload(request, claims.sub).await?;

    let response = FileUploadResponse {
        token: result.token,
        original_name: result.original_name,
        size: result.size,
        expires_at: result.expires_at.to_rfc3339(),
    };

    Ok(Json(ApiResponse::new(response)))
}

/// DELETE /api/files/:token - Delete an owned file by share token.
#[utoipa::path(
    delete,
    path = "/files/{token}",
    tag = "files",
    params(
        ("token" = String, Path, description = "Share token of the file")
    ),
    responses(
        (status = 200, description = "File deleted", body = FileDeleteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "File belongs to another user"),
        (status = 404, description = "Unknown share token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<FileDeleteResponse>>, ApiError> {
    let service = FileService::new(&state.db, &state.storage, &state.policy);
    let result = service.delete(&token, claims.sub).await?;

    Ok(Json(ApiResponse::new(FileDeleteResponse {
        original_name: result.original_name,
    })))
}

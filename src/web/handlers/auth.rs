//! Authentication handlers.

use axum::{extract::State, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

use crate::db::{Database, NewUser, UserRepository};
use crate::file::{FileStorage, UploadPolicy};
use crate::web::dto::{ApiResponse, AuthResponse, LoginRequest, RegisterRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::middleware::JwtClaims;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Arc<Database>,
    /// Blob storage.
    pub storage: FileStorage,
    /// Upload validation policy.
    pub policy: UploadPolicy,
    /// JWT encoding key.
    pub encoding_key: EncodingKey,
    /// Access token expiry in seconds.
    pub token_expiry: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: Arc<Database>,
        storage: FileStorage,
        policy: UploadPolicy,
        jwt_secret: &str,
        token_expiry: u64,
    ) -> Self {
        Self {
            db,
            storage,
            policy,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            token_expiry,
        }
    }

    /// Generate an access token for a user.
    pub fn generate_access_token(&self, user_id: i64, email: &str) -> Result<String, ApiError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = JwtClaims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.token_expiry,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }
}

/// POST /api/auth/register - Register a new account.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid email or password")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let password_hash = crate::hash_password(&req.password)
        .map_err(|e| ApiError::unprocessable(format!("Password error: {}", e)))?;

    let repo = UserRepository::new(state.db.pool());
    let user = repo
        .create(&NewUser::new(&req.email, password_hash))
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ApiError::conflict("Email already registered")
            } else {
                tracing::error!("User creation failed: {}", e);
                ApiError::internal("Failed to create user")
            }
        })?;

    tracing::info!(user_id = user.id, "User registered");

    let access_token = state.generate_access_token(user.id, &user.email)?;

    Ok(Json(ApiResponse::new(AuthResponse {
        access_token,
        expires_in: state.token_expiry,
    })))
}

/// POST /api/auth/login - Log in with email and password.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    // Unknown email and wrong password produce the same response
    let repo = UserRepository::new(state.db.pool());
    let user = repo
        .get_by_email(&req.email)
        .await
        .map_err(|e| {
            tracing::error!("User lookup failed: {}", e);
            ApiError::internal("Login failed")
        })?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    crate::verify_password(&req.password, &user.password)
        .map_err(|_| ApiError::unauthorized("Invalid email or password"))?;

    let access_token = state.generate_access_token(user.id, &user.email)?;

    Ok(Json(ApiResponse::new(AuthResponse {
        access_token,
        expires_in: state.token_expiry,
    })))
}

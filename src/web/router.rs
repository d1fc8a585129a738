//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{
    AuthResponse, FileDeleteResponse, FileUploadResponse, LoginRequest, RegisterRequest,
};
use super::handlers::{delete_file, login, register, upload_file, AppState};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    // Auth routes (no authentication required)
    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    // File routes (bearer token required via the AuthUser extractor)
    let file_routes = Router::new()
        .route("/upload", post(upload_file))
        .route("/:token", delete(delete_file));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/files", file_routes);

    // Multipart bodies must be able to carry the largest allowed file
    let body_limit = app_state.policy.max_file_size() as usize + 1024 * 1024;

    // Clone jwt_state for the middleware closure
    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DataShare API",
        description = "Authenticated file sharing with expiring share tokens"
    ),
    servers((url = "/api")),
    paths(
        crate::web::handlers::auth::register,
        crate::web::handlers::auth::login,
        crate::web::handlers::file::upload_file,
        crate::web::handlers::file::delete_file,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        FileUploadResponse,
        FileDeleteResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "files", description = "File upload and deletion"),
    )
)]
struct ApiDoc;

/// Adds the bearer token security scheme to the OpenAPI document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

//! HTTP route definitions

use crate::{handlers, middleware, ApiError, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Listing route
pub const LIST_PATH: &str = "/api/gallery";
/// Upload route
pub const UPLOAD_PATH: &str = "/api/gallery/upload";
/// Download route
pub const DOWNLOAD_PATH: &str = "/api/gallery/download";
/// Delete route
pub const DELETE_PATH: &str = "/api/gallery/delete";

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // Service endpoints
        .route("/health", get(handlers::health_check))
        // Gallery endpoints
        .route(
            LIST_PATH,
            get(handlers::list_images).fallback(method_not_allowed),
        )
        .route(
            UPLOAD_PATH,
            post(handlers::upload_image).fallback(method_not_allowed),
        )
        .route(
            DOWNLOAD_PATH,
            get(handlers::download_image).fallback(method_not_allowed),
        )
        .route(
            DELETE_PATH,
            delete(handlers::delete_image).fallback(method_not_allowed),
        )
        // Apply middleware
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(state.config.max_upload_size));

    let router = if state.config.cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

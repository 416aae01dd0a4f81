use axum::{http::HeaderValue, routing::get, Json, Router};
use discotheque_db::AppState;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;

pub use config::ServerConfig;

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

/// Assemble the full application router.
///
/// `image_dir` is the directory the image storage writes into; it is served
/// under `/images` so stored `image` paths resolve against the server root.
pub fn app(state: Arc<AppState>, config: &ServerConfig, image_dir: &Path) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/albums", api::albums_router(config.upload_body_limit()))
        .nest_service("/images", ServeDir::new(image_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [
        axum::http::Method::GET,
        axum::http::Method::POST,
        axum::http::Method::OPTIONS,
    ];

    if origins.is_empty() {
        tracing::warn!("CORS_ORIGINS not set, cross-origin requests will be refused");
        return CorsLayer::new().allow_methods(methods);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    tracing::info!("CORS allowed origins: {:?}", allowed);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(methods)
        .allow_headers(tower_http::cors::Any)
}

async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

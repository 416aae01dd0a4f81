pub mod albums;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use discotheque_db::AppState;
use std::sync::Arc;

/// Album routes, relative to their mount point.
pub fn albums_router(upload_body_limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(albums::list_albums)
                .post(albums::create_album)
                .layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/{id}", get(albums::get_album))
}

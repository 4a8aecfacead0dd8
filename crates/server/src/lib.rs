// crates/server/src/lib.rs
// HTTP server for the playlog backlog: JSON API under /api plus the built
// frontend bundle as static files.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
///
/// When `static_dir` exists, unknown paths fall back to its `index.html`
/// so client-side routes survive a refresh.
pub fn create_app(state: Arc<AppState>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().nest("/api", routes::api_routes());

    if static_dir.is_dir() {
        let index = static_dir.join("index.html");
        app = app.fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index)));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

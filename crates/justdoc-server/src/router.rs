use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};
use crate::openapi;

/// Build the axum router with all JustDoc endpoints.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_body_size;
    Router::new()
        .route("/", get(handler::list_channels))
        .route("/openapi.json", get(openapi::openapi_handler))
        .route("/:channel/", get(handler::list_documents))
        .route(
            "/:channel/:document",
            get(handler::get_document).post(handler::put_document),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Router assembly: HTTP endpoints, token auth, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::require_token;
use crate::state::AppState;

pub mod extract;
pub mod http;

/// Build the application router with:
/// - REST API under `/api/v1/...` (token auth on everything but health)
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers), adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    let protected = Router::new()
        .route(
            "/api/v1/exam_question",
            get(http::http_list_questions).post(http::http_create_question),
        )
        .route(
            "/api/v1/exam_question/:id",
            get(http::http_get_question)
                .put(http::http_put_question)
                .patch(http::http_patch_question)
                .delete(http::http_delete_question),
        )
        .route(
            "/api/v1/user_answer",
            get(http::http_list_answers).post(http::http_create_answer),
        )
        .route(
            "/api/v1/user_answer/:id",
            get(http::http_get_answer)
                .patch(http::http_patch_answer)
                .delete(http::http_delete_answer),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .merge(protected)
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}

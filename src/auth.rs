//! Token authentication middleware.
//!
//! Clients send `Authorization: Token <key>` (`Bearer <key>` is accepted too).
//! The resolved `AuthUser` is stored in request extensions for handlers.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Extract the key from an Authorization header value.
pub fn parse_token(header: &str) -> Option<&str> {
    let (scheme, key) = header.trim().split_once(' ')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        Some(key)
    } else {
        None
    }
}

/// Reject requests without a known token (401).
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_token)
        .and_then(|token| state.authenticate(token));

    let Some(user) = user else {
        warn!(target: "auth", method = %request.method(), path = %request.uri().path(), "Rejected unauthenticated request");
        return Err(ApiError::Unauthorized);
    };

    debug!(target: "auth", user = user.id, email = %user.email, "Authenticated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

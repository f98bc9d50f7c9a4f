//! Request extractors that report rejections through `ApiError`, so every
//! client error carries the same JSON body.

use axum::{
  async_trait,
  extract::{FromRequest, FromRequestParts, Path, Request},
  http::{header::CONTENT_TYPE, request::Parts, HeaderMap},
  Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Request body decoded from `application/x-www-form-urlencoded` or JSON.
///
/// Form clients send `choices` as a JSON-encoded string; the DTOs accept both shapes.
#[derive(Debug)]
pub struct Payload<T>(pub T);

fn is_form(headers: &HeaderMap) -> bool {
  headers
    .get(CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/x-www-form-urlencoded"))
    .unwrap_or(false)
}

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
  T: DeserializeOwned + Send,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    if is_form(req.headers()) {
      let Form(v) = Form::<T>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(Payload(v))
    } else {
      let Json(v) = Json::<T>::from_request(req, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
      Ok(Payload(v))
    }
  }
}

/// Numeric record id from the `:id` path segment.
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub u64);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(id) = Path::<u64>::from_request_parts(parts, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(RecordId(id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::HeaderValue;

  fn headers(ct: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
    h
  }

  #[test]
  fn detects_form_content_type() {
    assert!(is_form(&headers("application/x-www-form-urlencoded")));
    assert!(is_form(&headers("application/x-www-form-urlencoded; charset=utf-8")));
    assert!(is_form(&headers("Application/X-WWW-Form-Urlencoded")));
    assert!(!is_form(&headers("application/json")));
    assert!(!is_form(&HeaderMap::new()));
  }
}

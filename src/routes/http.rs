//! HTTP endpoint handlers. These are thin wrappers that forward to the state store.
//! Bodies may be JSON or urlencoded forms (see `extract::Payload`).
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::State,
  http::StatusCode,
  response::IntoResponse,
  Extension, Json,
};
use tracing::{info, instrument};

use crate::domain::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::protocol::*;
use crate::routes::extract::{Payload, RecordId};
use crate::state::AppState;

fn question_not_found(id: u64) -> ApiError {
  ApiError::NotFound(format!("exam_question {}", id))
}

fn answer_not_found(id: u64) -> ApiError {
  ApiError::NotFound(format!("user_answer {}", id))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

// -------- Questions --------

#[instrument(level = "info", skip(state))]
pub async fn http_list_questions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let out: Vec<QuestionOut> = state.list_questions().await.into_iter().map(Into::into).collect();
  info!(target: "question", count = out.len(), "HTTP questions listed");
  Json(out)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_create_question(
  State(state): State<Arc<AppState>>,
  Payload(body): Payload<QuestionIn>,
) -> ApiResult<(StatusCode, Json<QuestionOut>)> {
  let draft = body.into_draft()?;
  let q = state.create_question(draft).await?;
  info!(target: "question", id = q.id, "HTTP question created");
  Ok((StatusCode::CREATED, Json(q.into())))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_question(
  State(state): State<Arc<AppState>>,
  RecordId(id): RecordId,
) -> ApiResult<Json<QuestionOut>> {
  let q = state.get_question(id).await.ok_or_else(|| question_not_found(id))?;
  Ok(Json(q.into()))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_put_question(
  State(state): State<Arc<AppState>>,
  RecordId(id): RecordId,
  Payload(body): Payload<QuestionPut>,
) -> ApiResult<Json<QuestionOut>> {
  let update = body.into_update()?;
  let q = state.update_question(id, update).await?;
  info!(target: "question", id, "HTTP question replaced");
  Ok(Json(q.into()))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_patch_question(
  State(state): State<Arc<AppState>>,
  RecordId(id): RecordId,
  Payload(body): Payload<QuestionPatch>,
) -> ApiResult<Json<QuestionOut>> {
  let update = body.into_update()?;
  let q = state.update_question(id, update).await?;
  info!(target: "question", id, "HTTP question patched");
  Ok(Json(q.into()))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_question(
  State(state): State<Arc<AppState>>,
  RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
  if state.delete_question(id).await {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(question_not_found(id))
  }
}

// -------- Answer records --------

#[instrument(level = "info", skip(state, user), fields(user = user.id))]
pub async fn http_list_answers(
  State(state): State<Arc<AppState>>,
  Extension(user): Extension<AuthUser>,
) -> impl IntoResponse {
  let out: Vec<UserAnswerOut> = state.list_answers(user.id).await.into_iter().map(Into::into).collect();
  Json(out)
}

#[instrument(level = "info", skip(state, user, body), fields(user = user.id))]
pub async fn http_create_answer(
  State(state): State<Arc<AppState>>,
  Extension(user): Extension<AuthUser>,
  Payload(body): Payload<UserAnswerIn>,
) -> ApiResult<(StatusCode, Json<UserAnswerOut>)> {
  let new = body.into();
  let rec = state.create_answer(&user, new).await?;
  info!(target: "answer", id = rec.id, question_id = rec.question_id, "HTTP answer recorded");
  Ok((StatusCode::CREATED, Json(rec.into())))
}

#[instrument(level = "info", skip(state, user), fields(user = user.id))]
pub async fn http_get_answer(
  State(state): State<Arc<AppState>>,
  Extension(user): Extension<AuthUser>,
  RecordId(id): RecordId,
) -> ApiResult<Json<UserAnswerOut>> {
  let rec = state.get_answer(user.id, id).await.ok_or_else(|| answer_not_found(id))?;
  Ok(Json(rec.into()))
}

#[instrument(level = "info", skip(state, user, body), fields(user = user.id))]
pub async fn http_patch_answer(
  State(state): State<Arc<AppState>>,
  Extension(user): Extension<AuthUser>,
  RecordId(id): RecordId,
  Payload(body): Payload<UserAnswerPatch>,
) -> ApiResult<Json<UserAnswerOut>> {
  let changes = body.into();
  let rec = state.update_answer(user.id, id, changes).await?;
  Ok(Json(rec.into()))
}

#[instrument(level = "info", skip(state, user), fields(user = user.id))]
pub async fn http_delete_answer(
  State(state): State<Arc<AppState>>,
  Extension(user): Extension<AuthUser>,
  RecordId(id): RecordId,
) -> ApiResult<StatusCode> {
  if state.delete_answer(user.id, id).await {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(answer_not_found(id))
  }
}

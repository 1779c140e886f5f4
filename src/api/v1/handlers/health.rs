/*
 * Responsibility
 * - GET /health (疎通用, 認証なし)
 * - engine の realm を返して設定が読めていることを確認できるようにする
 */
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "realm": state.auth.realm()})),
    )
}

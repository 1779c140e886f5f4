/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / WWW-Authenticate / JSON error body)
 * - AuthError の詳細は log 用。wire には「credential なし」と「invalid_token」の 2 種類だけを出す
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {source}")]
    Unauthorized { realm: String, source: AuthError },
}

impl AppError {
    pub fn unauthorized(realm: impl Into<String>, source: AuthError) -> Self {
        Self::Unauthorized {
            realm: realm.into(),
            source,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Unauthorized { realm, source } = self;

        let challenge = source.challenge(&realm);
        let (code, message) = match source {
            AuthError::NoCredential => ("UNAUTHORIZED", "authentication required"),
            _ => ("INVALID_TOKEN", "invalid token"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: message.into(),
            },
        };

        let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        // realm is checked at config load, so this only fails for hand-built errors
        if let Ok(value) = HeaderValue::from_str(&challenge) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}

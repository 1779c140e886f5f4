/*
 * Responsibility
 * - /{resource} 系 handler（demo 用。CRUD や永続化は持たない）
 * - 認証済みコンテキスト (AuthCtx) の中身をそのまま返す
 */
use axum::{
    Json,
    extract::Path,
    http::{Method, StatusCode},
};
use serde::Serialize;

use crate::api::v1::extractors::AuthCtxExtractor;

#[derive(Debug, Serialize)]
pub struct ResourceAccessResponse {
    pub resource: String,
    pub method: String,
    pub subject: String,
    pub roles: Vec<String>,
}

pub async fn access_resource(
    method: Method,
    Path(resource): Path<String>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> (StatusCode, Json<ResourceAccessResponse>) {
    (
        StatusCode::OK,
        Json(ResourceAccessResponse {
            resource,
            method: method.to_string(),
            subject: ctx.subject,
            roles: ctx.roles,
        }),
    )
}

pub async fn access_item(
    method: Method,
    Path((resource, _item_id)): Path<(String, String)>,
    auth: AuthCtxExtractor,
) -> (StatusCode, Json<ResourceAccessResponse>) {
    access_resource(method, Path(resource), auth).await
}

/// `authen_claims` 相当: 検証済み payload 全体
pub async fn whoami(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "authen_claims": ctx.claims,
        "authen_roles": ctx.roles,
    }))
}

/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は認証なし、/{resource} は resource 単位の policy で認証
 * - Bearer が必要な範囲は route_layer で適用する（merge 前に掛けた route のみ対象）
 */
use axum::{
    Router,
    routing::{any, get},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    resources::{access_item, access_resource, whoami},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    // `/me` is resolved like a resource named "me"
    let me_policy = state.auth.policy_for("me");
    let me = middleware::auth::require_token(
        Router::new().route("/me", get(whoami)),
        state.clone(),
        me_policy,
    );

    let resources = middleware::auth::apply(
        Router::new()
            .route("/{resource}", any(access_resource))
            .route("/{resource}/{item_id}", any(access_item)),
        state,
    );

    public.merge(me).merge(resources)
}

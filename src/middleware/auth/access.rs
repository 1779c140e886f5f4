//! access token（JWT）検証 → AuthCtx を extensions に入れる
//!
//! - resource は path の先頭 segment（nest 済み router から見た path）
//! - 判定は `AuthDecisionEngine` に任せ、ここは HTTP との橋渡しだけを行う
//! - 失敗理由の詳細は log にだけ出し、response は 401 + WWW-Authenticate

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AuthDecision, AuthRequest, ResourceAuthPolicy};
use crate::state::AppState;

/// 設定済み resource 単位で認証を掛ける。
///
/// 例：
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// resource 設定を持たない個別 route に、明示した policy で認証を掛ける。
pub fn require_token(
    router: Router<AppState>,
    state: AppState,
    policy: ResourceAuthPolicy,
) -> Router<AppState> {
    let policy = Arc::new(policy);
    router.route_layer(middleware::from_fn_with_state(
        (state, policy),
        policy_middleware,
    ))
}

/// `/foo/123` -> `foo`
pub fn resource_from_path(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or_default()
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let resource = resource_from_path(req.uri().path()).to_string();

    let decision = state.auth.authorize(AuthRequest {
        headers: req.headers(),
        query: req.uri().query(),
        resource: &resource,
        method: req.method(),
    });

    let auth_ctx = into_ctx(&state, &resource, decision)?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

async fn policy_middleware(
    State((state, policy)): State<(AppState, Arc<ResourceAuthPolicy>)>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let decision = state.auth.authorize_with(
        AuthRequest {
            headers: req.headers(),
            query: req.uri().query(),
            resource: &policy.resource,
            method: req.method(),
        },
        &policy,
    );

    let auth_ctx = into_ctx(&state, &policy.resource, decision)?;
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

fn into_ctx(
    state: &AppState,
    resource: &str,
    decision: AuthDecision,
) -> Result<AuthCtx, AppError> {
    decision.map_err(|err| {
        tracing::warn!(
            resource = %resource,
            reason = err.kind().as_str(),
            error = %err,
            "access token rejected"
        );
        AppError::unauthorized(state.auth.realm(), err)
    })
}

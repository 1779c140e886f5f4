#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end behaviour of the auth layer through the axum router.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header};
use resource_jwt_auth::{
    app::build_router,
    config::{AuthSettings, ResourceSettings},
    services::auth::AuthDecisionEngine,
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

const ISSUER: &str = "https://domain.com/token";
const SUBJECT: &str = "0123456789abcdef01234567";

fn app() -> Router {
    let settings = AuthSettings::new("secret", ISSUER, ["aud1"])
        .with_resource("foo", ResourceSettings::default())
        .with_resource("bar", ResourceSettings::default().with_audiences(["aud2"]))
        .with_resource(
            "baz",
            ResourceSettings::default().with_allowed_roles(["role"]),
        );
    let engine = AuthDecisionEngine::new(&settings).unwrap();
    build_router(AppState::new(Arc::new(engine)))
}

fn token_with(claims: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn token(claims: &Value) -> String {
    token_with(claims, "secret")
}

fn base_claims(aud: &str) -> Value {
    json!({"iss": ISSUER, "aud": aud, "sub": SUBJECT})
}

async fn send(method: Method, uri: &str, bearer: Option<&str>) -> axum::response::Response {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = bearer {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    app().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

async fn get_query(path: &str, token: &str) -> axum::response::Response {
    send(Method::GET, &format!("{path}?access_token={token}"), None).await
}

fn challenge(res: &axum::response::Response) -> Option<&str> {
    res.headers()
        .get(header::WWW_AUTHENTICATE)
        .map(|v| v.to_str().unwrap())
}

async fn json_body(res: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn restricted_access_without_token() {
    let res = send(Method::GET, "/api/v1/foo", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(challenge(&res), Some(r#"Bearer realm="eve_auth_jwt""#));
}

#[tokio::test]
async fn malformed_token_is_rejected_with_invalid_token_challenge() {
    let res = send(Method::GET, "/api/v1/foo?access_token=invalid", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        challenge(&res),
        Some(r#"Bearer realm="eve_auth_jwt", error="invalid_token""#)
    );

    let body = json_body(res).await;
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn empty_query_token_gets_invalid_token_challenge() {
    let res = send(Method::GET, "/api/v1/foo?access_token=", None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        challenge(&res),
        Some(r#"Bearer realm="eve_auth_jwt", error="invalid_token""#)
    );
}

#[tokio::test]
async fn valid_token_in_header() {
    let res = send(Method::GET, "/api/v1/foo", Some(&token(&base_claims("aud1")))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res).await;
    assert_eq!(body["resource"], "foo");
    assert_eq!(body["subject"], SUBJECT);
}

#[tokio::test]
async fn valid_token_in_query() {
    let res = get_query("/api/v1/foo", &token(&base_claims("aud1"))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn item_routes_use_the_collection_policy() {
    let res = get_query("/api/v1/bar/42", &token(&base_claims("aud2"))).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = get_query("/api/v1/bar/42", &token(&base_claims("aud1"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn claims_are_exposed_to_handlers() {
    let claims = base_claims("aud1");
    let res = get_query("/api/v1/me", &token(&claims)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res).await;
    assert_eq!(body["authen_claims"], claims);
    assert_eq!(body["authen_roles"], json!([]));
}

#[tokio::test]
async fn roles_are_exposed_to_handlers() {
    let claims = json!({"iss": ISSUER, "aud": "aud1", "sub": SUBJECT, "roles": ["role"]});
    let res = get_query("/api/v1/baz", &token(&claims)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body = json_body(res).await;
    assert_eq!(body["roles"], json!(["role"]));
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let res = get_query("/api/v1/foo", &token_with(&base_claims("aud1"), "invalid secret")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        challenge(&res),
        Some(r#"Bearer realm="eve_auth_jwt", error="invalid_token""#)
    );
}

#[tokio::test]
async fn missing_subject_is_rejected() {
    let claims = json!({"iss": ISSUER, "aud": "aud1"});
    let res = get_query("/api/v1/foo", &token(&claims)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_issuer_is_rejected() {
    let claims = json!({"iss": "https://invalid-domain.com/token", "aud": "aud1", "sub": SUBJECT});
    let res = get_query("/api/v1/foo", &token(&claims)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let exp = chrono::Utc::now().timestamp() - 600;
    let claims = json!({"iss": ISSUER, "aud": "aud1", "sub": SUBJECT, "exp": exp});
    let res = get_query("/api/v1/foo", &token(&claims)).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        challenge(&res),
        Some(r#"Bearer realm="eve_auth_jwt", error="invalid_token""#)
    );
}

#[tokio::test]
async fn default_audience_resource() {
    // scenario 1 / 2
    let res = get_query("/api/v1/foo", &token(&base_claims("aud1"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = get_query("/api/v1/foo", &token(&base_claims("aud2"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn overridden_audience_resource() {
    // scenario 3 / 4
    let res = get_query("/api/v1/bar", &token(&base_claims("aud2"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = get_query("/api/v1/bar", &token(&base_claims("aud1"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_restricted_resource() {
    // scenario 5
    let with_role = json!({"iss": ISSUER, "aud": "aud1", "sub": SUBJECT, "roles": ["role"]});
    let res = get_query("/api/v1/baz", &token(&with_role)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = get_query("/api/v1/baz", &token(&base_claims("aud1"))).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        challenge(&res),
        Some(r#"Bearer realm="eve_auth_jwt", error="invalid_token""#)
    );
}

#[tokio::test]
async fn user_scope_allows_everything() {
    let claims = json!({"iss": ISSUER, "aud": "aud1", "sub": SUBJECT, "scope": "user"});
    let t = token(&claims);
    assert_eq!(
        send(Method::GET, "/api/v1/foo", Some(&t)).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        send(Method::POST, "/api/v1/foo", Some(&t)).await.status(),
        StatusCode::OK
    );
}

#[tokio::test]
async fn viewer_scope_is_read_only() {
    // scenario 6
    let claims = json!({"iss": ISSUER, "aud": "aud1", "sub": SUBJECT, "scope": "viewer"});
    let t = token(&claims);

    let res = send(Method::GET, &format!("/api/v1/foo?access_token={t}"), None).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(Method::POST, &format!("/api/v1/foo?access_token={t}"), None).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        challenge(&res),
        Some(r#"Bearer realm="eve_auth_jwt", error="invalid_token""#)
    );
}

#[tokio::test]
async fn health_is_public() {
    let res = send(Method::GET, "/api/v1/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(challenge(&res).is_none());
}

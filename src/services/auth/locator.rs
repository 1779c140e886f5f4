//! Bearer token location.
//!
//! Lookup order:
//! 1. `Authorization: Bearer <token>` (scheme keyword is case-sensitive)
//! 2. `?access_token=<token>` query parameter (present but empty still counts)
//! 3. `Authorization: Basic <b64(token:)>` (token carried as the basic-auth user)
//!
//! Nothing found is not an error: the caller distinguishes "no credential" from
//! "credential present but invalid".

use axum::http::{HeaderMap, header};
use base64::Engine as _;

pub const ACCESS_TOKEN_PARAM: &str = "access_token";

pub fn locate_token(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if let Some(token) = authorization.and_then(bearer_token) {
        return Some(token.to_string());
    }

    if let Some(token) = query.and_then(query_token) {
        return Some(token);
    }

    authorization.and_then(basic_user_token)
}

fn bearer_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn query_token(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == ACCESS_TOKEN_PARAM)
        .map(|(_, v)| v.into_owned())
}

fn basic_user_token(value: &str) -> Option<String> {
    let encoded = value.strip_prefix("Basic ")?.trim();
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    // user[:password]; the password part is ignored
    let user = decoded.split(':').next().unwrap_or_default();
    (!user.is_empty()).then(|| user.to_string())
}

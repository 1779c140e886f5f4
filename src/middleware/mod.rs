/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: JWT 認証 / 認可, http: request-id・trace・body limit・timeout
 */
pub mod auth;
pub mod http;

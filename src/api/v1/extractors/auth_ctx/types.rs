/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が engine の結果を request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証や role/scope 判定は services::auth の責務
 * - ここは「型（契約）」として固定化する
 */
use serde::Serialize;

use crate::services::auth::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `subject` は `sub` claim
/// - `roles` は設定された roles claim の値（無ければ空）
/// - `claims` は検証済み payload 全体
#[derive(Debug, Clone, Serialize)]
pub struct AuthCtx {
    pub subject: String,
    pub roles: Vec<String>,
    pub claims: Claims,
}

impl AuthCtx {
    pub fn new(subject: String, roles: Vec<String>, claims: Claims) -> Self {
        Self {
            subject,
            roles,
            claims,
        }
    }
}

/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: auth: AuthDecisionEngine
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::AuthDecisionEngine;

#[derive(Clone, Debug)]
pub struct AppState {
    pub auth: Arc<AuthDecisionEngine>,
}

impl AppState {
    pub fn new(auth: Arc<AuthDecisionEngine>) -> Self {
        Self { auth }
    }
}

/// Factory: build the shared `AuthDecisionEngine` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, ConfigError};
use crate::services::auth::AuthDecisionEngine;

pub fn build_engine(config: &Config) -> Result<Arc<AuthDecisionEngine>, ConfigError> {
    let engine = AuthDecisionEngine::new(&config.auth)?;

    tracing::info!(
        realm = %engine.realm(),
        issuer = %config.auth.issuer,
        audiences = ?config.auth.audiences,
        resources = config.auth.resources.len(),
        "auth engine ready"
    );

    Ok(Arc::new(engine))
}

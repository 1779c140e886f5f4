//! Per-request authentication / authorization decision.
//!
//! `Start -> TokenFound -> ClaimsValid -> Allow`, each step either advances or
//! terminates with a classified `AuthError`. No state survives the call.

use axum::http::{HeaderMap, Method};
use tracing::debug;

use crate::api::v1::extractors::AuthCtx;
use crate::config::{AuthSettings, ConfigError};
use crate::services::auth::access::AccessPolicyEvaluator;
use crate::services::auth::error::AuthError;
use crate::services::auth::locator::locate_token;
use crate::services::auth::policy::{AudiencePolicy, ResourceAuthPolicy};
use crate::services::auth::verifier::ClaimsVerifier;

pub type AuthDecision = Result<AuthCtx, AuthError>;

/// What the host knows about the request.
#[derive(Debug, Clone, Copy)]
pub struct AuthRequest<'a> {
    pub headers: &'a HeaderMap,
    pub query: Option<&'a str>,
    pub resource: &'a str,
    pub method: &'a Method,
}

#[derive(Debug, Clone)]
pub struct AuthDecisionEngine {
    realm: String,
    verifier: ClaimsVerifier,
    audiences: AudiencePolicy,
    access: AccessPolicyEvaluator,
}

impl AuthDecisionEngine {
    pub fn new(settings: &AuthSettings) -> Result<Self, ConfigError> {
        settings.validate()?;

        Ok(Self {
            realm: settings.realm.clone(),
            verifier: ClaimsVerifier::new(settings),
            audiences: AudiencePolicy::from_settings(settings),
            access: AccessPolicyEvaluator::new(settings),
        })
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn policy_for(&self, resource: &str) -> ResourceAuthPolicy {
        self.audiences.resolve(resource)
    }

    /// Decide for a configured (or default-policy) resource.
    pub fn authorize(&self, req: AuthRequest<'_>) -> AuthDecision {
        let policy = self.audiences.resolve(req.resource);
        self.authorize_with(req, &policy)
    }

    /// Decide against an explicit policy, e.g. a custom route that is not a
    /// configured resource.
    pub fn authorize_with(&self, req: AuthRequest<'_>, policy: &ResourceAuthPolicy) -> AuthDecision {
        let token = locate_token(req.headers, req.query).ok_or(AuthError::NoCredential)?;

        let claims = self.verifier.verify(&token, &policy.audiences)?;

        self.access.evaluate(&claims, policy, req.method)?;

        let roles = self.access.roles(&claims);
        let subject = claims.subject().unwrap_or_default().to_string();

        debug!(
            resource = %policy.resource,
            method = %req.method,
            subject = %subject,
            "request authorized"
        );

        Ok(AuthCtx::new(subject, roles, claims))
    }
}

//! Role and scope checks over verified claims.
//!
//! Role check first, then scope; the first failure is reported.

use axum::http::Method;

use crate::config::AuthSettings;
use crate::services::auth::claims::Claims;
use crate::services::auth::error::AuthError;
use crate::services::auth::policy::ResourceAuthPolicy;

#[derive(Debug, Clone)]
pub struct AccessPolicyEvaluator {
    roles_claim: String,
    scope_claim: String,
    read_only_scopes: Vec<String>,
}

impl AccessPolicyEvaluator {
    pub fn new(settings: &AuthSettings) -> Self {
        Self {
            roles_claim: settings.roles_claim.clone(),
            scope_claim: settings.scope_claim.clone(),
            read_only_scopes: settings.read_only_scopes.clone(),
        }
    }

    /// Roles carried by the token under the configured claim name (absent => empty).
    pub fn roles(&self, claims: &Claims) -> Vec<String> {
        claims
            .string_set(&self.roles_claim)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn evaluate(
        &self,
        claims: &Claims,
        policy: &ResourceAuthPolicy,
        method: &Method,
    ) -> Result<(), AuthError> {
        self.check_roles(claims, policy)?;
        self.check_scope(claims, method)
    }

    fn check_roles(&self, claims: &Claims, policy: &ResourceAuthPolicy) -> Result<(), AuthError> {
        let Some(allowed) = &policy.allowed_roles else {
            return Ok(());
        };

        let granted = claims
            .string_set(&self.roles_claim)
            .iter()
            .any(|role| allowed.iter().any(|a| a == role));

        if granted {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole {
                resource: policy.resource.clone(),
            })
        }
    }

    fn check_scope(&self, claims: &Claims, method: &Method) -> Result<(), AuthError> {
        let Some(scope) = claims.string(&self.scope_claim) else {
            return Ok(());
        };

        // Unrecognized scopes add no restriction beyond the role check.
        if self.read_only_scopes.iter().any(|s| s == scope) && !is_safe_method(method) {
            return Err(AuthError::InsufficientScope {
                scope: scope.to_string(),
                method: method.to_string(),
            });
        }

        Ok(())
    }
}

/// Retrieval-only methods.
pub fn is_safe_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}

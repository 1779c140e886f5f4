/*
 * Responsibility
 * - 環境変数からの設定読み込み (JWT_SECRET, JWT_ISSUER, JWT_AUDIENCES, resource overrides など)
 * - 設定値のバリデーション (不足・矛盾があれば起動失敗)
 * - AuthSettings は engine に渡す typed な設定。起動後は不変
 */
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::HeaderValue;
use jsonwebtoken::Algorithm;
use serde::Deserialize;

use crate::services::auth::AuthError;

pub const DEFAULT_REALM: &str = "eve_auth_jwt";
pub const DEFAULT_ROLES_CLAIM: &str = "roles";
pub const DEFAULT_SCOPE_CLAIM: &str = "scope";
pub const DEFAULT_READ_ONLY_SCOPE: &str = "viewer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
    // resource name + what is wrong with it
    InvalidResource(String, &'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
            ConfigError::InvalidResource(name, reason) => {
                write!(f, "invalid configuration for resource '{}': {}", name, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Per-resource overrides.
///
/// - `audiences` replaces the global audience set (no union).
/// - `allowed_roles` restricts the resource to principals holding one of the roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSettings {
    #[serde(default)]
    pub audiences: Option<Vec<String>>,
    #[serde(default)]
    pub allowed_roles: Option<Vec<String>>,
}

impl ResourceSettings {
    pub fn with_audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audiences = Some(audiences.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_allowed_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }
}

/// Everything the decision engine needs. Immutable once the engine is built.
#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub issuer: String,
    pub audiences: Vec<String>,
    pub roles_claim: String,
    pub scope_claim: String,
    pub realm: String,
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
    pub read_only_scopes: Vec<String>,
    pub resources: BTreeMap<String, ResourceSettings>,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret
        f.debug_struct("AuthSettings")
            .field("issuer", &self.issuer)
            .field("audiences", &self.audiences)
            .field("roles_claim", &self.roles_claim)
            .field("scope_claim", &self.scope_claim)
            .field("realm", &self.realm)
            .field("algorithms", &self.algorithms)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("read_only_scopes", &self.read_only_scopes)
            .field("resources", &self.resources)
            .finish()
    }
}

impl AuthSettings {
    /// Settings with the defaults used by `from_env` for everything but secret/issuer/audiences.
    pub fn new<I, S>(secret: impl Into<String>, issuer: impl Into<String>, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audiences: audiences.into_iter().map(Into::into).collect(),
            roles_claim: DEFAULT_ROLES_CLAIM.to_string(),
            scope_claim: DEFAULT_SCOPE_CLAIM.to_string(),
            realm: DEFAULT_REALM.to_string(),
            algorithms: vec![Algorithm::HS256],
            leeway_seconds: 0,
            read_only_scopes: vec![DEFAULT_READ_ONLY_SCOPE.to_string()],
            resources: BTreeMap::new(),
        }
    }

    pub fn with_resource(mut self, name: impl Into<String>, resource: ResourceSettings) -> Self {
        self.resources.insert(name.into(), resource);
        self
    }

    pub fn with_realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let issuer = std::env::var("JWT_ISSUER").map_err(|_| ConfigError::Missing("JWT_ISSUER"))?;

        let audiences = split_list(&std::env::var("JWT_AUDIENCES").unwrap_or_default());

        let roles_claim =
            std::env::var("JWT_ROLES_CLAIM").unwrap_or_else(|_| DEFAULT_ROLES_CLAIM.to_string());
        let scope_claim =
            std::env::var("JWT_SCOPE_CLAIM").unwrap_or_else(|_| DEFAULT_SCOPE_CLAIM.to_string());
        let realm = std::env::var("JWT_REALM").unwrap_or_else(|_| DEFAULT_REALM.to_string());

        let algorithms = match std::env::var("JWT_ALGORITHMS") {
            Ok(raw) => split_list(&raw)
                .iter()
                .map(|s| parse_hmac_algorithm(s))
                .collect::<Result<Vec<_>, _>>()?,
            Err(_) => vec![Algorithm::HS256],
        };

        let leeway_seconds = match std::env::var("JWT_LEEWAY_SECONDS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("JWT_LEEWAY_SECONDS"))?,
            Err(_) => 0,
        };

        let read_only_scopes = std::env::var("JWT_READ_ONLY_SCOPES")
            .map(|raw| split_list(&raw))
            .unwrap_or_else(|_| vec![DEFAULT_READ_ONLY_SCOPE.to_string()]);

        let resources = match std::env::var("JWT_RESOURCES") {
            Ok(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
                .map_err(|_| ConfigError::Invalid("JWT_RESOURCES"))?,
            _ => BTreeMap::new(),
        };

        let settings = Self {
            secret,
            issuer,
            audiences,
            roles_claim,
            scope_claim,
            realm,
            algorithms,
            leeway_seconds,
            read_only_scopes,
            resources,
        };
        settings.validate()?;

        Ok(settings)
    }

    /// Load-time validation. The engine refuses to start on an inconsistent configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_ISSUER"));
        }
        if self.roles_claim.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_ROLES_CLAIM"));
        }
        if self.scope_claim.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SCOPE_CLAIM"));
        }
        // the realm ends up inside a quoted-string of a response header
        if self.realm.contains('"')
            || HeaderValue::from_str(&AuthError::NoCredential.challenge(&self.realm)).is_err()
        {
            return Err(ConfigError::Invalid("JWT_REALM"));
        }
        if self.algorithms.is_empty() {
            return Err(ConfigError::Invalid("JWT_ALGORITHMS"));
        }
        if !self.algorithms.iter().all(|alg| is_hmac(*alg)) {
            return Err(ConfigError::Invalid("JWT_ALGORITHMS"));
        }

        for (name, resource) in &self.resources {
            if matches!(&resource.audiences, Some(auds) if auds.is_empty()) {
                return Err(ConfigError::InvalidResource(
                    name.clone(),
                    "audiences override must not be empty",
                ));
            }
            if matches!(&resource.allowed_roles, Some(roles) if roles.is_empty()) {
                return Err(ConfigError::InvalidResource(
                    name.clone(),
                    "allowed_roles must not be empty",
                ));
            }
            if resource.audiences.is_none() && self.audiences.is_empty() {
                return Err(ConfigError::InvalidResource(
                    name.clone(),
                    "inherits an empty global audience set",
                ));
            }
        }

        Ok(())
    }
}

/// Transport knobs for the demo host (not used by the engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub body_limit_bytes: usize,
    pub request_timeout_seconds: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            body_limit_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}

impl HttpSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let body_limit_bytes = std::env::var("HTTP_BODY_LIMIT_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.body_limit_bytes);

        let request_timeout_seconds = std::env::var("HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.request_timeout_seconds);

        Self {
            body_limit_bytes,
            request_timeout_seconds,
        }
    }
}

pub struct Config {
    pub addr: SocketAddr,
    pub http: HttpSettings,
    pub auth: AuthSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let http = HttpSettings::from_env();
        let auth = AuthSettings::from_env()?;

        Ok(Self { addr, http, auth })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
}

fn parse_hmac_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    let alg = Algorithm::from_str(raw).map_err(|_| ConfigError::Invalid("JWT_ALGORITHMS"))?;
    if !is_hmac(alg) {
        return Err(ConfigError::Invalid("JWT_ALGORITHMS"));
    }
    Ok(alg)
}

fn is_hmac(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

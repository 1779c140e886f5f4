use thiserror::Error;

/// Why a verified signature still did not yield acceptable claims.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("issuer mismatch (got {0:?})")]
    IssuerMismatch(Option<String>),
    #[error("audience does not intersect the resource audiences")]
    AudienceMismatch,
    #[error("missing 'sub' claim")]
    MissingSubject,
}

/// Classified authentication / authorization failure.
///
/// Every variant is terminal for the request. Only `NoCredential` vs. the rest is
/// visible to clients; the detail is for logs.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credential supplied")]
    NoCredential,
    #[error("invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("invalid claims: {0}")]
    InvalidClaims(#[source] ClaimsError),
    #[error("roles do not grant access to resource '{resource}'")]
    InsufficientRole { resource: String },
    #[error("scope '{scope}' does not permit {method}")]
    InsufficientScope { scope: String, method: String },
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            Self::NoCredential => AuthErrorKind::NoCredential,
            Self::InvalidToken(_) => AuthErrorKind::InvalidToken,
            Self::InvalidClaims(_) => AuthErrorKind::InvalidClaims,
            Self::InsufficientRole { .. } => AuthErrorKind::InsufficientRole,
            Self::InsufficientScope { .. } => AuthErrorKind::InsufficientScope,
        }
    }

    /// `WWW-Authenticate` challenge for this failure.
    pub fn challenge(&self, realm: &str) -> String {
        match self {
            Self::NoCredential => format!("Bearer realm=\"{}\"", realm),
            _ => format!("Bearer realm=\"{}\", error=\"invalid_token\"", realm),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken(e)
    }
}

impl From<ClaimsError> for AuthError {
    fn from(e: ClaimsError) -> Self {
        Self::InvalidClaims(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    NoCredential,
    InvalidToken,
    InvalidClaims,
    InsufficientRole,
    InsufficientScope,
}

impl AuthErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoCredential => "no_credential",
            Self::InvalidToken => "invalid_token",
            Self::InvalidClaims => "invalid_claims",
            Self::InsufficientRole => "insufficient_role",
            Self::InsufficientScope => "insufficient_scope",
        }
    }
}

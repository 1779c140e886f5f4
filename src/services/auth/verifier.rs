use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::config::AuthSettings;
use crate::services::auth::claims::Claims;
use crate::services::auth::error::{AuthError, ClaimsError};

/// HMAC (shared secret) token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct ClaimsVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl std::fmt::Debug for ClaimsVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("ClaimsVerifier")
            .field("validation", &self.validation)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl ClaimsVerifier {
    pub fn new(settings: &AuthSettings) -> Self {
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());

        let primary = settings.algorithms.first().copied().unwrap_or(Algorithm::HS256);
        let mut validation = Validation::new(primary);
        validation.algorithms = settings.algorithms.clone();
        validation.leeway = settings.leeway_seconds;
        // exp/nbf are checked when present, but not required
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // iss/aud are compared below against the per-resource policy so that a
        // mismatch is reported as a claims failure, not a token failure
        validation.validate_aud = false;

        Self {
            decoding_key,
            validation,
            issuer: settings.issuer.clone(),
        }
    }

    /// Signature + exp/nbf. Structural, signature and time failures are `InvalidToken`.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }

    /// Decode, then check issuer, audience (against `audiences`) and subject.
    pub fn verify(&self, token: &str, audiences: &[String]) -> Result<Claims, AuthError> {
        let claims = self.decode(token)?;

        match claims.issuer() {
            Some(iss) if iss == self.issuer => {}
            other => {
                return Err(ClaimsError::IssuerMismatch(other.map(str::to_string)).into());
            }
        }

        let intersects = claims
            .audiences()
            .iter()
            .any(|aud| audiences.iter().any(|a| a == aud));
        if !intersects {
            return Err(ClaimsError::AudienceMismatch.into());
        }

        if claims.subject().is_none() {
            return Err(ClaimsError::MissingSubject.into());
        }

        Ok(claims)
    }
}

pub mod access;
pub mod claims;
pub mod engine;
pub mod error;
pub mod factory;
pub mod locator;
pub mod policy;
pub mod verifier;

pub use access::AccessPolicyEvaluator;
pub use claims::Claims;
pub use engine::{AuthDecision, AuthDecisionEngine, AuthRequest};
pub use error::{AuthError, AuthErrorKind, ClaimsError};
pub use factory::build_engine;
pub use locator::locate_token;
pub use policy::{AudiencePolicy, ResourceAuthPolicy};
pub use verifier::ClaimsVerifier;

// ABOUTME: Bearer credential lifecycle: signing secret, claim schema, issuer, validator, access gate
// ABOUTME: Credentials are stateless HS256 JWTs carrying the provider access token

use jsonwebtoken::Algorithm;

pub mod claims;
pub mod gate;
pub mod issuer;
pub mod secret;
pub mod validator;

pub use claims::Claims;
pub use gate::{bearer_token, AccessGate};
pub use issuer::{TokenIssuer, DEFAULT_VALIDITY_HOURS, MAX_VALIDITY_HOURS};
pub use secret::SigningSecret;
pub use validator::TokenValidator;

/// The single MAC algorithm credentials are signed and verified with
pub const CREDENTIAL_ALGORITHM: Algorithm = Algorithm::HS256;

//! Bearer token issue and verification.

use chrono::{Duration, Utc};
use common::UserId;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Required prefix on the authorization header value.
pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 bearer tokens against a pre-shared secret.
///
/// Verification is pure: signature and expiry only, no lookups and no
/// server-side session state.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl TokenVerifier {
    /// Creates a verifier with the default 7-day token validity.
    pub fn new(secret: &str) -> Self {
        Self::with_validity(secret, Duration::days(7))
    }

    /// Creates a verifier with an explicit token validity window.
    pub fn with_validity(secret: &str, validity: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validity,
        }
    }

    /// Issues a signed token for the given user.
    pub fn issue(&self, user_id: UserId) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_uuid(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(AuthError::Issue)
    }

    /// Verifies a raw token and resolves the caller identity.
    ///
    /// Any signature or expiry failure collapses to [`AuthError::Invalid`];
    /// the caller learns nothing about which check failed.
    pub fn verify(&self, raw_token: &str) -> Result<UserId, AuthError> {
        let data =
            jsonwebtoken::decode::<Claims>(raw_token, &self.decoding, &Validation::default())
                .map_err(|_| AuthError::Invalid)?;
        Ok(UserId::from_uuid(data.claims.sub))
    }

    /// Verifies the value of an `Authorization` header.
    ///
    /// An absent header or one without the `Bearer ` prefix is rejected
    /// with [`AuthError::Missing`] before any token inspection.
    pub fn verify_header(&self, header: Option<&str>) -> Result<UserId, AuthError> {
        let header = header.ok_or(AuthError::Missing)?;
        let token = header.strip_prefix(BEARER_PREFIX).ok_or(AuthError::Missing)?;
        self.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_same_user() {
        let verifier = TokenVerifier::new("test-secret");
        let user_id = UserId::new();

        let token = verifier.issue(user_id).unwrap();
        let resolved = verifier.verify(&token).unwrap();
        assert_eq!(resolved, user_id);
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let issuer = TokenVerifier::new("secret-a");
        let verifier = TokenVerifier::new("secret-b");

        let token = issuer.issue(UserId::new()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(AuthError::Invalid)));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let verifier = TokenVerifier::new("test-secret");
        assert!(matches!(
            verifier.verify("not.a.token"),
            Err(AuthError::Invalid)
        ));
    }

    #[test]
    fn expired_token_is_invalid() {
        // Issue a token that expired a day ago, well past validation leeway.
        let verifier = TokenVerifier::with_validity("test-secret", Duration::days(-1));
        let token = verifier.issue(UserId::new()).unwrap();
        assert!(matches!(verifier.verify(&token), Err(AuthError::Invalid)));
    }

    #[test]
    fn header_must_be_present_and_prefixed() {
        let verifier = TokenVerifier::new("test-secret");
        let user_id = UserId::new();
        let token = verifier.issue(user_id).unwrap();

        assert!(matches!(
            verifier.verify_header(None),
            Err(AuthError::Missing)
        ));
        // A bare token without the prefix is rejected before inspection.
        assert!(matches!(
            verifier.verify_header(Some(token.as_str())),
            Err(AuthError::Missing)
        ));

        let basic = format!("Basic {token}");
        assert!(matches!(
            verifier.verify_header(Some(basic.as_str())),
            Err(AuthError::Missing)
        ));

        let bearer = format!("Bearer {token}");
        let resolved = verifier.verify_header(Some(bearer.as_str())).unwrap();
        assert_eq!(resolved, user_id);
    }
}

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::AuthError;

use super::types::Role;

/// JWT Claims - data stored in the token
///
/// The payload carries an opaque principal id and the role at issuance
/// time, with no account-kind discriminator; resolution is the resolver's
/// job.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // Subject (principal id as string)
    pub role: Role,  // Role at issuance time
    pub exp: i64,    // Expiration timestamp
    pub iat: i64,    // Issued at timestamp
    pub iss: String, // Issuer
}

impl Claims {
    /// Principal id parsed back out of the subject claim.
    pub fn principal_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::TokenInvalid)
    }
}

/// A freshly minted token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Token service - creates and verifies signed bearer tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl TokenService {
    /// Create new token service with secret and issuer
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    /// Mint a token binding the principal id and role.
    ///
    /// The caller appends the token to the owning account's token list
    /// before handing it to the client.
    pub fn issue(&self, principal_id: Uuid, role: Role, ttl: Duration) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + ttl;

        let claims = Claims {
            sub: principal_id.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature, expiry, and issuer.
    ///
    /// Returns claims if the token is valid and not expired. Revocation is
    /// not checked here; the middleware checks it first.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_token() {
        let service = TokenService::new("test_secret_key", "test_issuer".to_string());
        let principal_id = Uuid::new_v4();

        let issued = service
            .issue(principal_id, Role::Admin, Duration::hours(1))
            .unwrap();

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.principal_id().unwrap(), principal_id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let service = TokenService::new("test_secret_key", "test_issuer".to_string());
        let result = service.verify("invalid_token");
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = TokenService::new("secret1", "test_issuer".to_string());
        let service2 = TokenService::new("secret2", "test_issuer".to_string());

        let issued = service1
            .issue(Uuid::new_v4(), Role::Customer, Duration::days(30))
            .unwrap();

        // Token signed with secret1 should not verify with secret2
        let result = service2.verify(&issued.token);
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_wrong_issuer() {
        let service1 = TokenService::new("test_secret_key", "issuer_one".to_string());
        let service2 = TokenService::new("test_secret_key", "issuer_two".to_string());

        let issued = service1
            .issue(Uuid::new_v4(), Role::User, Duration::hours(1))
            .unwrap();

        let result = service2.verify(&issued.token);
        assert!(matches!(result, Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let service = TokenService::new("test_secret_key", "test_issuer".to_string());

        // Expiry two hours in the past
        let issued = service
            .issue(Uuid::new_v4(), Role::Customer, Duration::hours(-2))
            .unwrap();

        let result = service.verify(&issued.token);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_ttl_sets_expiry() {
        let service = TokenService::new("test_secret_key", "test_issuer".to_string());

        let issued = service
            .issue(Uuid::new_v4(), Role::Admin, Duration::hours(1))
            .unwrap();

        let claims = service.verify(&issued.token).unwrap();
        let now = Utc::now().timestamp();
        let expires_in = claims.exp - now;
        assert!(expires_in > 3500, "admin tokens should live about an hour");
        assert!(expires_in <= 3600);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }
}

//! Authentication service for bearer JWTs.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{Principal, Role};
use crate::error::AppError;

/// Claims carried by access tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues and verifies HS256 access tokens.
///
/// Tokens are stateless: a valid signature and an unexpired `exp` are all that
/// is checked. Accounts themselves live outside this service.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Mints a token for `user_id` valid for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the token cannot be encoded.
    pub fn issue(&self, user_id: Uuid, role: Role, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::now_v7().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            AppError::internal("Failed to issue token", json!({ "reason": e.to_string() }))
        })
    }

    /// Verifies a raw bearer token and returns the caller it identifies.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the signature is wrong, the token
    /// expired, or its subject is not a user id.
    pub fn authenticate(&self, token: &str) -> Result<Principal, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                AppError::unauthorized("Unauthorized", json!({ "reason": e.to_string() }))
            })?;

        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Token subject is not a user id" }),
            )
        })?;

        Ok(Principal {
            user_id,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-signing-secret")
    }

    #[test]
    fn test_issue_and_authenticate_user() {
        let user_id = Uuid::now_v7();
        let token = service().issue(user_id, Role::User, Duration::hours(1)).unwrap();

        let principal = service().authenticate(&token).unwrap();

        assert_eq!(principal.user_id, user_id);
        assert_eq!(principal.role, Role::User);
    }

    #[test]
    fn test_issue_and_authenticate_admin() {
        let token = service()
            .issue(Uuid::now_v7(), Role::Admin, Duration::hours(1))
            .unwrap();

        assert!(service().authenticate(&token).unwrap().is_admin());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = AuthService::new("another-secret")
            .issue(Uuid::now_v7(), Role::User, Duration::hours(1))
            .unwrap();

        let err = service().authenticate(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = service()
            .issue(Uuid::now_v7(), Role::User, Duration::hours(-2))
            .unwrap();

        assert!(service().authenticate(&token).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(service().authenticate("not-a-jwt").is_err());
        assert!(service().authenticate("").is_err());
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "admin".to_string(),
            role: Role::Admin,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
            jti: "x".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-signing-secret"),
        )
        .unwrap();

        assert!(service().authenticate(&token).is_err());
    }
}

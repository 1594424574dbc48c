//! JWT issuance and verification (HS256).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use linkfolio_core::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Admin flag captured at issuance
    pub admin: bool,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

pub fn issue_token(
    user_id: Uuid,
    is_admin: bool,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: user_id,
        admin: is_admin,
        iat: now.timestamp(),
        nbf: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Verifies signature, expiry, and not-before. The caller never learns which
/// check failed.
pub fn verify_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    let mut validation = Validation::default();
    validation.validate_nbf = true;
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-with-enough-length-0123456789";

    #[test]
    fn test_token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_token(user_id, true, SECRET, 24).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert!(claims.admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue_token(Uuid::new_v4(), false, SECRET, 24).unwrap();
        let err = verify_token(&token, "another-secret-with-enough-length").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Issued two hours in the past; well beyond the default leeway.
        let token = issue_token(Uuid::new_v4(), false, SECRET, -2).unwrap();
        let err = verify_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let err = verify_token("not-a-jwt", SECRET).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}

// SPDX-License-Identifier: MIT

//! Access/refresh token issuance.
//!
//! Access and refresh tokens are signed with distinct secrets. The refresh
//! token is additionally persisted on the user record and rotated on each
//! use; verification alone is not enough to accept one.

use crate::config::Config;
use crate::error::{AppError, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// An access/refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
    access_expire_secs: u64,
    refresh_expire_secs: u64,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        Self {
            access_secret: config.jwt_access_secret.clone(),
            refresh_secret: config.jwt_refresh_secret.clone(),
            access_expire_secs: config.jwt_access_expire_minutes * 60,
            refresh_expire_secs: config.jwt_refresh_expire_days * 24 * 60 * 60,
        }
    }

    /// Issue a fresh access/refresh pair for a user.
    pub fn issue_pair(&self, user_id: &str, role: &str) -> Result<TokenPair> {
        let now = unix_now()?;

        let access_token = sign(
            user_id,
            role,
            now,
            self.access_expire_secs,
            &self.access_secret,
        )?;
        let refresh_token = sign(
            user_id,
            role,
            now,
            self.refresh_expire_secs,
            &self.refresh_secret,
        )?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token's signature and expiry.
    pub fn verify_access(&self, token: &str) -> Result<Claims> {
        verify(token, &self.access_secret)
    }

    /// Verify a refresh token's signature and expiry.
    ///
    /// The caller must still compare the token with the value stored on the
    /// user record before accepting it.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims> {
        verify(token, &self.refresh_secret)
    }

    /// Seconds until a new refresh token expires (cookie Max-Age).
    pub fn refresh_expire_secs(&self) -> u64 {
        self.refresh_expire_secs
    }
}

fn unix_now() -> Result<usize> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_secs() as usize)
}

fn sign(user_id: &str, role: &str, now: usize, expire_secs: u64, secret: &[u8]) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + expire_secs as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Token signing failed: {}", e)))
}

fn verify(token: &str, secret: &[u8]) -> Result<Claims> {
    let key = DecodingKey::from_secret(secret);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&Config::test_default())
    }

    #[test]
    fn test_access_token_round_trip() {
        let issuer = issuer();
        let pair = issuer.issue_pair("user-1", "user").unwrap();

        let claims = issuer.verify_access(&pair.access_token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, "user");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let issuer = issuer();
        let pair = issuer.issue_pair("user-1", "user").unwrap();

        let claims = issuer.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn test_tokens_use_distinct_secrets() {
        let issuer = issuer();
        let pair = issuer.issue_pair("user-1", "user").unwrap();

        // A refresh token must not pass as an access token, and vice versa
        assert!(issuer.verify_access(&pair.refresh_token).is_err());
        assert!(issuer.verify_refresh(&pair.access_token).is_err());
    }

    #[test]
    fn test_refresh_outlives_access() {
        let issuer = issuer();
        let pair = issuer.issue_pair("user-1", "user").unwrap();

        let access = issuer.verify_access(&pair.access_token).unwrap();
        let refresh = issuer.verify_refresh(&pair.refresh_token).unwrap();
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let issuer = issuer();
        assert!(matches!(
            issuer.verify_access("not.a.token"),
            Err(AppError::InvalidToken)
        ));
    }
}

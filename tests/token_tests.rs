// SPDX-License-Identifier: MIT

//! Token issuer compatibility tests.
//!
//! These tests verify that tokens minted by the issuer can be decoded by
//! the auth middleware's claim structure, catching drift between the two.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use fittrack_api::config::Config;
use fittrack_api::services::tokens::TokenIssuer;

/// Claims structure that must match what the middleware expects.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    exp: usize,
    iat: usize,
}

#[test]
fn test_access_token_decodes_with_middleware_claims() {
    let config = Config::test_default();
    let issuer = TokenIssuer::new(&config);

    let pair = issuer.issue_pair("user-42", "user").unwrap();

    let key = DecodingKey::from_secret(&config.jwt_access_secret);
    let validation = Validation::new(Algorithm::HS256);

    let data = decode::<Claims>(&pair.access_token, &key, &validation)
        .expect("Failed to decode access token - check Claims struct compatibility");

    assert_eq!(data.claims.sub, "user-42");
    assert_eq!(data.claims.role, "user");
    assert!(data.claims.exp > data.claims.iat);
}

#[test]
fn test_refresh_token_uses_refresh_secret() {
    let config = Config::test_default();
    let issuer = TokenIssuer::new(&config);

    let pair = issuer.issue_pair("user-42", "user").unwrap();

    let access_key = DecodingKey::from_secret(&config.jwt_access_secret);
    let refresh_key = DecodingKey::from_secret(&config.jwt_refresh_secret);
    let validation = Validation::new(Algorithm::HS256);

    // Refresh token only decodes with the refresh secret
    assert!(decode::<Claims>(&pair.refresh_token, &access_key, &validation).is_err());
    assert!(decode::<Claims>(&pair.refresh_token, &refresh_key, &validation).is_ok());
}

#[test]
fn test_token_lifetimes_follow_config() {
    let config = Config::test_default();
    let issuer = TokenIssuer::new(&config);

    let pair = issuer.issue_pair("user-42", "user").unwrap();

    let access = issuer.verify_access(&pair.access_token).unwrap();
    let refresh = issuer.verify_refresh(&pair.refresh_token).unwrap();

    let access_lifetime = (access.exp - access.iat) as u64;
    let refresh_lifetime = (refresh.exp - refresh.iat) as u64;

    assert_eq!(access_lifetime, config.jwt_access_expire_minutes * 60);
    assert_eq!(refresh_lifetime, config.jwt_refresh_expire_days * 24 * 60 * 60);
}

#[test]
fn test_admin_role_carried_in_claims() {
    let config = Config::test_default();
    let issuer = TokenIssuer::new(&config);

    let pair = issuer.issue_pair("admin-1", "admin").unwrap();
    let claims = issuer.verify_access(&pair.access_token).unwrap();
    assert_eq!(claims.role, "admin");
}

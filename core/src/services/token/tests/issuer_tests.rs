//! Tests for access token issuance and rotation-time validation

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use crate::domain::entities::identity::{AuthenticatedIdentity, IdentityKind};
use crate::domain::entities::token::AccessTokenClaims;
use crate::errors::RotationRejection;
use crate::services::token::{
    generate_refresh_token_value, hash_refresh_token, TokenIssuer, TokenIssuerConfig,
};

fn issuer() -> TokenIssuer {
    TokenIssuer::new(TokenIssuerConfig::default()).unwrap()
}

fn identity(kind: IdentityKind) -> AuthenticatedIdentity {
    AuthenticatedIdentity {
        identity_id: Uuid::new_v4(),
        domain_entity_id: Uuid::new_v4(),
        email: "service@example.com".to_string(),
        kind,
    }
}

fn sign(claims: &AccessTokenClaims, algorithm: Algorithm, secret: &str) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_issue_and_validate() {
    let issuer = issuer();
    let identity = identity(IdentityKind::Workshop);

    let issued = issuer.issue(&identity).unwrap();
    let claims = issuer.validate_ignoring_expiry(&issued.access_token).unwrap();

    assert_eq!(claims.identity_id().unwrap(), identity.identity_id);
    assert_eq!(claims.jti_id().unwrap(), issued.jti);
    assert_eq!(claims.email, identity.email);
    assert_eq!(claims.identity_type, IdentityKind::Workshop);
    assert_eq!(claims.iss, "garage");
    assert_eq!(claims.aud, "garage-api");
    assert_eq!(claims.exp, issued.expires_at.timestamp());
    assert!(issued.expires_at > Utc::now());
}

#[test]
fn test_every_issuance_has_fresh_jti() {
    let issuer = issuer();
    let identity = identity(IdentityKind::User);

    let first = issuer.issue(&identity).unwrap();
    let second = issuer.issue(&identity).unwrap();

    assert_ne!(first.jti, second.jti);
    assert_ne!(first.access_token, second.access_token);
}

#[test]
fn test_expired_token_is_accepted_for_rotation() {
    let issuer = issuer();
    let config = issuer.config().clone();
    let mut claims = AccessTokenClaims::new(
        &identity(IdentityKind::User),
        Uuid::new_v4(),
        &config.issuer,
        &config.audience,
        15,
    ).unwrap();
    let past = Utc::now() - Duration::hours(2);
    claims.iat = past.timestamp();
    claims.nbf = past.timestamp();
    claims.exp = (past + Duration::minutes(15)).timestamp();

    let token = sign(&claims, Algorithm::HS256, &config.jwt_secret);

    assert_eq!(issuer.validate_ignoring_expiry(&token).unwrap(), claims);
}

#[test]
fn test_other_algorithm_is_rejected() {
    let issuer = issuer();
    let config = issuer.config().clone();
    let claims = AccessTokenClaims::new(
        &identity(IdentityKind::User),
        Uuid::new_v4(),
        &config.issuer,
        &config.audience,
        15,
    ).unwrap();

    // Same key, different HMAC variant.
    let token = sign(&claims, Algorithm::HS512, &config.jwt_secret);

    assert_eq!(
        issuer.validate_ignoring_expiry(&token),
        Err(RotationRejection::InvalidAccessToken)
    );
}

#[test]
fn test_wrong_key_is_rejected() {
    let issuer = issuer();
    let config = issuer.config().clone();
    let claims = AccessTokenClaims::new(
        &identity(IdentityKind::User),
        Uuid::new_v4(),
        &config.issuer,
        &config.audience,
        15,
    ).unwrap();
    let token = sign(&claims, Algorithm::HS256, "another-secret-that-is-also-long-enough");

    assert_eq!(
        issuer.validate_ignoring_expiry(&token),
        Err(RotationRejection::InvalidAccessToken)
    );
}

#[test]
fn test_foreign_issuer_and_audience_are_rejected() {
    let issuer = issuer();
    let config = issuer.config().clone();
    let identity = identity(IdentityKind::User);

    let foreign_issuer =
        AccessTokenClaims::new(&identity, Uuid::new_v4(), "elsewhere", &config.audience, 15).unwrap();
    let foreign_audience =
        AccessTokenClaims::new(&identity, Uuid::new_v4(), &config.issuer, "elsewhere-api", 15).unwrap();

    for claims in [foreign_issuer, foreign_audience] {
        let token = sign(&claims, Algorithm::HS256, &config.jwt_secret);
        assert_eq!(
            issuer.validate_ignoring_expiry(&token),
            Err(RotationRejection::InvalidAccessToken)
        );
    }
}

#[test]
fn test_garbage_is_rejected() {
    assert_eq!(
        issuer().validate_ignoring_expiry("not.a.token"),
        Err(RotationRejection::InvalidAccessToken)
    );
}

#[test]
fn test_refresh_token_value_shape() {
    let first = generate_refresh_token_value();
    let second = generate_refresh_token_value();

    assert_eq!(first.len(), 64);
    assert!(first
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert_ne!(first, second);
}

#[test]
fn test_refresh_token_hash() {
    let digest = hash_refresh_token("opaque-value");

    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(digest, hash_refresh_token("opaque-value"));
    assert_ne!(digest, hash_refresh_token("opaque-valuf"));
}

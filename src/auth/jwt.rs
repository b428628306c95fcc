use axum::extract::FromRef;
use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::{AccessClaims, ResetClaims, TokenKind};
use crate::auth::repo::Role;
use crate::config::JwtConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Token service: signs and verifies both token purposes with the shared
/// secret. Pure computation, no storage.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    reset_ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            algorithm: cfg.algorithm,
            access_ttl: Duration::minutes(cfg.access_ttl_minutes),
            reset_ttl: Duration::minutes(cfg.reset_ttl_minutes),
        }
    }

    pub fn sign_access(&self, email: &str, role: Role) -> anyhow::Result<String> {
        let (iat, exp) = self.window(self.access_ttl);
        let claims = AccessClaims {
            sub: email.to_string(),
            role,
            iat,
            exp,
            kind: TokenKind::Access,
        };
        let token = self.sign(&claims)?;
        debug!(email = %email, role = ?role, "access token signed");
        Ok(token)
    }

    /// Verify a bearer token. Signature mismatch, malformed encoding, wrong
    /// purpose and expiry all collapse into the same rejection.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, ApiError> {
        let claims: AccessClaims = self.verify(token)?;
        if claims.kind != TokenKind::Access {
            return Err(ApiError::authentication());
        }
        Ok(claims)
    }

    /// Sign a reset token bound to the password hash current at issuance.
    pub fn sign_reset(&self, email: &str, password_hash: &str) -> anyhow::Result<String> {
        let (iat, exp) = self.window(self.reset_ttl);
        let claims = ResetClaims {
            sub: email.to_string(),
            pwd: password_fingerprint(password_hash),
            iat,
            exp,
            kind: TokenKind::Reset,
        };
        let token = self.sign(&claims)?;
        debug!(email = %email, "reset token signed");
        Ok(token)
    }

    /// Verify a reset token. The caller completes the single-use check by
    /// comparing `claims.pwd` against the fingerprint of the stored hash.
    pub fn verify_reset(&self, token: &str) -> Result<ResetClaims, ApiError> {
        let claims: ResetClaims = self
            .decode_claims(token)
            .map_err(|_| ApiError::InvalidToken)?;
        if claims.kind != TokenKind::Reset {
            return Err(ApiError::InvalidToken);
        }
        Ok(claims)
    }

    fn sign<C: Serialize>(&self, claims: &C) -> anyhow::Result<String> {
        Ok(encode(&Header::new(self.algorithm), claims, &self.encoding)?)
    }

    fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, ApiError> {
        self.decode_claims(token).map_err(|_| {
            debug!("token rejected");
            ApiError::authentication()
        })
    }

    fn decode_claims<C: DeserializeOwned>(&self, token: &str) -> jsonwebtoken::errors::Result<C> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_aud = false;
        Ok(decode::<C>(token, &self.decoding, &validation)?.claims)
    }

    fn window(&self, ttl: Duration) -> (usize, usize) {
        let now = OffsetDateTime::now_utc();
        let exp = now + ttl;
        (now.unix_timestamp() as usize, exp.unix_timestamp() as usize)
    }
}

/// Stable fingerprint of a password hash; embedded in reset-token claims.
/// A hash of a hash, so exposing it in the (signed, readable) payload leaks
/// nothing usable.
pub fn password_fingerprint(password_hash: &str) -> String {
    let digest = Sha256::digest(password_hash.as_bytes());
    Base64UrlUnpadded::encode_string(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, algorithm: Algorithm, access_ttl_minutes: i64) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            algorithm,
            access_ttl_minutes,
            reset_ttl_minutes: access_ttl_minutes,
        })
    }

    #[test]
    fn access_sign_verify_roundtrip() {
        let keys = make_keys("dev-secret", Algorithm::HS256, 5);
        let token = keys
            .sign_access("owner@cafe.test", Role::Owner)
            .expect("sign access");
        let claims = keys.verify_access(&token).expect("verify access");
        assert_eq!(claims.sub, "owner@cafe.test");
        assert_eq!(claims.role, Role::Owner);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_access_token_rejected() {
        let keys = make_keys("dev-secret", Algorithm::HS256, -5);
        let token = keys
            .sign_access("owner@cafe.test", Role::Owner)
            .expect("sign access");
        let err = keys.verify_access(&token).unwrap_err();
        assert!(matches!(err, ApiError::Authentication(_)));
    }

    #[test]
    fn wrong_secret_rejected() {
        let keys = make_keys("secret-one", Algorithm::HS256, 5);
        let other = make_keys("secret-two", Algorithm::HS256, 5);
        let token = keys
            .sign_access("owner@cafe.test", Role::Owner)
            .expect("sign access");
        assert!(other.verify_access(&token).is_err());
    }

    #[test]
    fn wrong_algorithm_rejected() {
        let keys = make_keys("same-secret", Algorithm::HS256, 5);
        let other = make_keys("same-secret", Algorithm::HS384, 5);
        let token = keys
            .sign_access("owner@cafe.test", Role::Owner)
            .expect("sign access");
        assert!(other.verify_access(&token).is_err());
    }

    #[test]
    fn tampered_token_rejected() {
        let keys = make_keys("dev-secret", Algorithm::HS256, 5);
        let mut token = keys
            .sign_access("owner@cafe.test", Role::Owner)
            .expect("sign access");
        token.pop();
        token.push('x');
        assert!(keys.verify_access(&token).is_err());
        assert!(keys.verify_access("not.a.jwt").is_err());
    }

    #[test]
    fn purpose_isolation_both_directions() {
        let keys = make_keys("dev-secret", Algorithm::HS256, 5);
        let access = keys
            .sign_access("owner@cafe.test", Role::Owner)
            .expect("sign access");
        let reset = keys
            .sign_reset("owner@cafe.test", "$argon2id$stored-hash")
            .expect("sign reset");

        assert!(matches!(
            keys.verify_reset(&access).unwrap_err(),
            ApiError::InvalidToken
        ));
        assert!(matches!(
            keys.verify_access(&reset).unwrap_err(),
            ApiError::Authentication(_)
        ));
    }

    #[test]
    fn reset_token_bound_to_password_hash() {
        let keys = make_keys("dev-secret", Algorithm::HS256, 5);
        let token = keys
            .sign_reset("owner@cafe.test", "hash-before")
            .expect("sign reset");
        let claims = keys.verify_reset(&token).expect("verify reset");

        // The embedded fingerprint matches the hash at issuance and stops
        // matching once the stored hash changes.
        assert_eq!(claims.pwd, password_fingerprint("hash-before"));
        assert_ne!(claims.pwd, password_fingerprint("hash-after"));
    }

    #[test]
    fn expired_reset_token_rejected() {
        let keys = make_keys("dev-secret", Algorithm::HS256, -5);
        let token = keys
            .sign_reset("owner@cafe.test", "stored-hash")
            .expect("sign reset");
        assert!(matches!(
            keys.verify_reset(&token).unwrap_err(),
            ApiError::InvalidToken
        ));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(password_fingerprint("abc"), password_fingerprint("abc"));
        assert_ne!(password_fingerprint("abc"), password_fingerprint("abd"));
    }
}

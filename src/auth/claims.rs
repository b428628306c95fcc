use serde::{Deserialize, Serialize};

use crate::auth::repo::Role;

/// Purpose tag baked into every token. An access token must never pass as a
/// reset token or the other way around.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Reset,
}

/// Bearer token payload: identity plus role, nothing persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String, // user email
    pub role: Role,
    pub iat: usize, // issued at (unix timestamp)
    pub exp: usize, // expires at (unix timestamp)
    pub kind: TokenKind,
}

/// Reset token payload. `pwd` is a fingerprint of the password hash current
/// at issuance; once the stored hash changes the token stops verifying, which
/// is what makes redemption single-use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub sub: String,
    pub pwd: String,
    pub iat: usize,
    pub exp: usize,
    pub kind: TokenKind,
}

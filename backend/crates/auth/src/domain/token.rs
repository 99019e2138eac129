//! Token Claims
//!
//! Payload carried by access and refresh tokens.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::token_version::TokenVersion;

/// Access or refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed token payload
///
/// `sub` is the account id, `iat`/`exp` are Unix seconds and `jti` makes
/// tokens minted within the same second distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub token_version: TokenVersion,
    pub iat: i64,
    pub exp: i64,
    pub typ: TokenKind,
    pub jti: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_wire_names() {
        let claims = Claims {
            sub: "abc".to_string(),
            token_version: TokenVersion::new(2),
            iat: 10,
            exp: 20,
            typ: TokenKind::Refresh,
            jti: "j".to_string(),
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["tokenVersion"], 2);
        assert_eq!(json["typ"], "refresh");
        assert_eq!(json["exp"], 20);
    }
}

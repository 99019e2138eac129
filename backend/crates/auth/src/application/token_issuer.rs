//! Token Issuer
//!
//! Mints and verifies HS256 access/refresh tokens. Each kind has its own
//! secret, so a token of one kind never verifies as the other.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use kernel::id::AccountId;
use thiserror::Error;

use crate::application::config::AuthConfig;
use crate::domain::token::{Claims, TokenKind};
use crate::domain::value_object::token_version::TokenVersion;
use crate::error::{AuthError, AuthResult};

/// Why a token was rejected. Only logged; clients see a uniform 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token malformed")]
    Malformed,

    #[error("token signature invalid")]
    BadSignature,
}

/// A verified token
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    pub account_id: AccountId,
    pub claims: Claims,
}

/// A freshly minted access/refresh pair
#[derive(Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_expires_at", &self.access_expires_at)
            .field("refresh_expires_at", &self.refresh_expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: ChronoDuration,
}

impl SigningKeys {
    fn new(secret: &[u8], ttl: std::time::Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::MAX),
        }
    }
}

#[derive(Clone)]
pub struct TokenIssuer {
    access: SigningKeys,
    refresh: SigningKeys,
}

impl TokenIssuer {
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: std::time::Duration,
        refresh_ttl: std::time::Duration,
    ) -> Self {
        Self {
            access: SigningKeys::new(access_secret, access_ttl),
            refresh: SigningKeys::new(refresh_secret, refresh_ttl),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.access_secret.as_bytes(),
            config.refresh_secret.as_bytes(),
            config.access_ttl,
            config.refresh_ttl,
        )
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Sign a token issued now.
    pub fn issue(
        &self,
        subject: &AccountId,
        version: TokenVersion,
        kind: TokenKind,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        self.issue_at(subject, version, kind, Utc::now())
    }

    /// Sign a token with an explicit issue time.
    pub fn issue_at(
        &self,
        subject: &AccountId,
        version: TokenVersion,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
    ) -> AuthResult<(String, DateTime<Utc>)> {
        let keys = self.keys(kind);
        let expires_at = issued_at
            .checked_add_signed(keys.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let claims = Claims {
            sub: subject.to_string(),
            token_version: version,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            typ: kind,
            jti: platform::crypto::random_secret(12),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))?;

        Ok((token, expires_at))
    }

    /// Mint access and refresh tokens for the same subject and version.
    pub fn issue_pair(&self, subject: &AccountId, version: TokenVersion) -> AuthResult<TokenPair> {
        let now = Utc::now();
        let (access_token, access_expires_at) =
            self.issue_at(subject, version, TokenKind::Access, now)?;
        let (refresh_token, refresh_expires_at) =
            self.issue_at(subject, version, TokenKind::Refresh, now)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
        })
    }

    /// Check signature, expiry (no leeway) and kind.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<VerifiedToken, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        let data = decode::<Claims>(token, &self.keys(kind).decoding, &validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                JwtErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?;

        if data.claims.typ != kind {
            return Err(TokenError::Malformed);
        }

        let account_id = data
            .claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| TokenError::Malformed)?;

        Ok(VerifiedToken {
            account_id,
            claims: data.claims,
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            b"access-secret",
            b"refresh-secret",
            Duration::from_secs(15 * 60),
            Duration::from_secs(7 * 86_400),
        )
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = issuer();
        let id = AccountId::new();
        let (token, _) = issuer
            .issue(&id, TokenVersion::new(3), TokenKind::Access)
            .unwrap();

        let verified = issuer.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(verified.account_id, id);
        assert_eq!(verified.claims.token_version, TokenVersion::new(3));
        assert_eq!(verified.claims.typ, TokenKind::Access);
        assert_eq!(verified.claims.exp - verified.claims.iat, 15 * 60);
    }

    #[test]
    fn test_wrong_kind_is_bad_signature() {
        let issuer = issuer();
        let pair = issuer
            .issue_pair(&AccountId::new(), TokenVersion::INITIAL)
            .unwrap();

        assert_eq!(
            issuer.verify(&pair.refresh_token, TokenKind::Access).unwrap_err(),
            TokenError::BadSignature
        );
        assert_eq!(
            issuer.verify(&pair.access_token, TokenKind::Refresh).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = issuer();
        let issued_at = Utc::now() - ChronoDuration::minutes(16);
        let (token, expires_at) = issuer
            .issue_at(&AccountId::new(), TokenVersion::INITIAL, TokenKind::Access, issued_at)
            .unwrap();

        assert!(expires_at < Utc::now());
        assert_eq!(
            issuer.verify(&token, TokenKind::Access).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let issuer = issuer();
        for garbage in ["", "abc", "a.b.c", "not a token at all"] {
            assert_eq!(
                issuer.verify(garbage, TokenKind::Access).unwrap_err(),
                TokenError::Malformed,
                "{garbage}"
            );
        }
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = issuer();
        let (token, _) = issuer
            .issue(&AccountId::new(), TokenVersion::INITIAL, TokenKind::Access)
            .unwrap();
        let forged = TokenIssuer::new(
            b"other-secret",
            b"refresh-secret",
            Duration::from_secs(60),
            Duration::from_secs(60),
        );
        assert_eq!(
            forged.verify(&token, TokenKind::Access).unwrap_err(),
            TokenError::BadSignature
        );
    }

    #[test]
    fn test_wrong_typ_under_right_key_is_malformed() {
        // Same secret for both kinds, so only the typ claim differs.
        let issuer = TokenIssuer::new(
            b"shared",
            b"shared",
            Duration::from_secs(60),
            Duration::from_secs(60),
        );
        let (token, _) = issuer
            .issue(&AccountId::new(), TokenVersion::INITIAL, TokenKind::Refresh)
            .unwrap();
        assert_eq!(
            issuer.verify(&token, TokenKind::Access).unwrap_err(),
            TokenError::Malformed
        );
    }

    #[test]
    fn test_pair_tokens_are_distinct() {
        let issuer = issuer();
        let id = AccountId::new();
        let a = issuer.issue_pair(&id, TokenVersion::INITIAL).unwrap();
        let b = issuer.issue_pair(&id, TokenVersion::INITIAL).unwrap();
        assert_ne!(a.refresh_token, b.refresh_token);
        assert_ne!(a.access_token, a.refresh_token);
    }
}

//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use platform::crypto::random_secret;
use platform::password::{HashCost, PasswordHashError};
use platform::rate_limit::RateLimitConfig;
use thiserror::Error;

/// Re-export SameSite from the cookie layer
pub use axum_extra::extract::cookie::SameSite;

/// What a successful refresh does to the account's token version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshRotation {
    /// Mint a new pair at the current version. Older refresh tokens stay
    /// valid until they expire or the version is bumped.
    #[default]
    Reissue,
    /// Bump the version on every refresh, killing every older pair.
    BumpVersion,
}

impl FromStr for RefreshRotation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reissue" => Ok(RefreshRotation::Reissue),
            "bump" | "bump_version" => Ok(RefreshRotation::BumpVersion),
            other => Err(ConfigError::UnknownRotation(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} secret must not be empty")]
    EmptySecret(&'static str),

    #[error("Access and refresh secrets must differ")]
    SharedSecret,

    #[error("{0} lifetime must be positive")]
    ZeroLifetime(&'static str),

    #[error("Unknown refresh rotation policy {0:?} (expected reissue or bump)")]
    UnknownRotation(String),

    #[error(transparent)]
    HashCost(#[from] PasswordHashError),
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 key for access tokens
    pub access_secret: String,
    /// HS256 key for refresh tokens (must differ from `access_secret`)
    pub refresh_secret: String,
    /// Access token lifetime (15 minutes)
    pub access_ttl: Duration,
    /// Refresh token lifetime (7 days)
    pub refresh_ttl: Duration,
    /// Refresh cookie name
    pub refresh_cookie_name: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Argon2id work factor
    pub hash_cost: HashCost,
    /// Upper bound for a single store call
    pub store_timeout: Duration,
    pub rotation: RefreshRotation,
    /// Per-address cap on `/auth/*`
    pub rate_limit: RateLimitConfig,
    /// Honour `X-Forwarded-For` when resolving the client address
    pub trust_forwarded_for: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: random_secret(32),
            refresh_secret: random_secret(32),
            access_ttl: Duration::from_secs(15 * 60),            // 15 minutes
            refresh_ttl: Duration::from_secs(7 * 24 * 3600),     // 1 week
            refresh_cookie_name: "refreshToken".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Strict,
            hash_cost: HashCost::default(),
            store_timeout: Duration::from_secs(5),
            rotation: RefreshRotation::default(),
            rate_limit: RateLimitConfig::default(),
            trust_forwarded_for: false,
        }
    }
}

impl AuthConfig {
    /// Create config with explicit signing secrets
    pub fn with_secrets(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            refresh_secret: refresh_secret.into(),
            ..Default::default()
        }
    }

    /// Create config for development (random secrets, insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Default::default()
        }
    }

    /// Reject configurations the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.is_empty() {
            return Err(ConfigError::EmptySecret("Access"));
        }
        if self.refresh_secret.is_empty() {
            return Err(ConfigError::EmptySecret("Refresh"));
        }
        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::SharedSecret);
        }
        if self.access_ttl.is_zero() {
            return Err(ConfigError::ZeroLifetime("Access token"));
        }
        if self.refresh_ttl.is_zero() {
            return Err(ConfigError::ZeroLifetime("Refresh token"));
        }
        if self.store_timeout.is_zero() {
            return Err(ConfigError::ZeroLifetime("Store timeout"));
        }
        self.hash_cost.validate()?;
        Ok(())
    }

    /// Access lifetime as reported in `expiresIn` (e.g. `15m`)
    pub fn access_ttl_label(&self) -> String {
        platform::duration::format_duration(self.access_ttl)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("hash_cost", &self.hash_cost)
            .field("store_timeout", &self.store_timeout)
            .field("rotation", &self.rotation)
            .field("rate_limit", &self.rate_limit)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AuthConfig::default();
        assert!(config.validate().is_ok());
        assert_ne!(config.access_secret, config.refresh_secret);
        assert_eq!(config.access_ttl_label(), "15m");
        assert_eq!(config.refresh_cookie_name, "refreshToken");
    }

    #[test]
    fn test_shared_secret_rejected() {
        let config = AuthConfig::with_secrets("same", "same");
        assert!(matches!(config.validate(), Err(ConfigError::SharedSecret)));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = AuthConfig::with_secrets("", "refresh");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptySecret("Access"))
        ));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let config = AuthConfig {
            access_ttl: Duration::ZERO,
            ..AuthConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroLifetime(_))
        ));
    }

    #[test]
    fn test_rotation_parse() {
        assert_eq!("reissue".parse::<RefreshRotation>().unwrap(), RefreshRotation::Reissue);
        assert_eq!("BUMP".parse::<RefreshRotation>().unwrap(), RefreshRotation::BumpVersion);
        assert!("never".parse::<RefreshRotation>().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig::with_secrets("top-secret-a", "top-secret-b");
        let debug = format!("{config:?}");
        assert!(!debug.contains("top-secret"));
    }
}

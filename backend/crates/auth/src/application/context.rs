//! Auth Context
//!
//! Configuration plus the collaborators built from it, shared by every use
//! case. Built once at startup and passed by `Arc`.

use crate::application::config::{AuthConfig, ConfigError};
use crate::application::credential_hasher::CredentialHasher;
use crate::application::session_cookie::SessionCookie;
use crate::application::token_issuer::TokenIssuer;

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub config: AuthConfig,
    pub hasher: CredentialHasher,
    pub issuer: TokenIssuer,
    pub cookie: SessionCookie,
}

impl AuthContext {
    /// Validate `config` and build the hasher, issuer and cookie manager.
    pub fn new(config: AuthConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            hasher: CredentialHasher::new(config.hash_cost)?,
            issuer: TokenIssuer::from_config(&config),
            cookie: SessionCookie::from_config(&config),
            config,
        })
    }
}

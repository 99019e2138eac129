//! Session Cookie Manager
//!
//! Carries the refresh token in an `HttpOnly` cookie. Attributes come from
//! a single [`CookiePolicy`] so the clearing cookie matches the one set.

use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use platform::cookie::CookiePolicy;

use crate::application::config::AuthConfig;

#[derive(Debug, Clone)]
pub struct SessionCookie {
    policy: CookiePolicy,
}

impl SessionCookie {
    pub fn new(policy: CookiePolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            CookiePolicy::new(config.refresh_cookie_name.clone())
                .with_path("/")
                .with_secure(config.cookie_secure)
                .with_same_site(config.cookie_same_site),
        )
    }

    /// Set the refresh cookie; `Max-Age` is the token's remaining lifetime.
    pub fn attach(
        &self,
        jar: CookieJar,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> CookieJar {
        let remaining = (expires_at - Utc::now()).to_std().unwrap_or_default();
        jar.add(self.policy.build(refresh_token, remaining))
    }

    /// Expire the refresh cookie immediately.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.policy.removal())
    }

    pub fn read(&self, jar: &CookieJar) -> Option<String> {
        self.policy.read(jar)
    }
}

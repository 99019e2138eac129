//! Runtime settings
//!
//! Read from the process environment (after `.env` is loaded) into an
//! [`AuthConfig`] plus the server-level knobs. Invalid values fail startup.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::{AuthConfig, RefreshRotation};
use axum::http::HeaderValue;
use platform::duration::parse_duration;
use platform::rate_limit::RateLimitConfig;

const DEFAULT_PORT: u16 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn is_production(self) -> bool {
        self == AppEnv::Production
    }
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "development" | "dev" | "test" => Ok(AppEnv::Development),
            "production" | "prod" => Ok(AppEnv::Production),
            other => bail!("Unknown APP_ENV '{other}'"),
        }
    }
}

#[derive(Debug)]
pub struct Settings {
    pub env: AppEnv,
    pub port: u16,
    pub database_url: Option<String>,
    pub cors_origins: Vec<HeaderValue>,
    pub auth: AuthConfig,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env = var("APP_ENV")
            .map(|v| v.parse::<AppEnv>())
            .transpose()?
            .unwrap_or(AppEnv::Development);

        let port = var("PORT")
            .map(|v| v.trim().parse::<u16>().context("PORT must be a port number"))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        let mut auth = if env.is_production() {
            let access = var("JWT_ACCESS_SECRET")
                .context("JWT_ACCESS_SECRET must be set in production")?;
            let refresh = var("JWT_REFRESH_SECRET")
                .context("JWT_REFRESH_SECRET must be set in production")?;
            AuthConfig::with_secrets(access, refresh)
        } else {
            let mut config = AuthConfig::development();
            if let Some(secret) = var("JWT_ACCESS_SECRET") {
                config.access_secret = secret;
            }
            if let Some(secret) = var("JWT_REFRESH_SECRET") {
                config.refresh_secret = secret;
            }
            config
        };

        if let Some(v) = var("ACCESS_TOKEN_EXPIRES") {
            auth.access_ttl = duration("ACCESS_TOKEN_EXPIRES", &v)?;
        }
        if let Some(v) = var("REFRESH_TOKEN_EXPIRES") {
            auth.refresh_ttl = duration("REFRESH_TOKEN_EXPIRES", &v)?;
        }
        if let Some(v) = var("STORE_TIMEOUT") {
            auth.store_timeout = duration("STORE_TIMEOUT", &v)?;
        }
        if let Some(v) = var("REFRESH_ROTATION") {
            auth.rotation = v.parse::<RefreshRotation>()?;
        }

        let max_requests = var("AUTH_RATE_LIMIT_MAX")
            .map(|v| {
                v.trim()
                    .parse::<u32>()
                    .context("AUTH_RATE_LIMIT_MAX must be a positive integer")
            })
            .transpose()?
            .unwrap_or(auth.rate_limit.max_requests);
        if max_requests == 0 {
            bail!("AUTH_RATE_LIMIT_MAX must be a positive integer");
        }
        let window = match var("AUTH_RATE_LIMIT_WINDOW") {
            Some(v) => duration("AUTH_RATE_LIMIT_WINDOW", &v)?,
            None => auth.rate_limit.window,
        };
        auth.rate_limit = RateLimitConfig::new(max_requests, window);

        if let Some(v) = var("TRUST_PROXY") {
            auth.trust_forwarded_for = matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
        }

        auth.validate().context("Invalid auth configuration")?;

        let cors_origins = var("CORS_ORIGIN")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(|o| {
                        o.parse::<HeaderValue>()
                            .with_context(|| format!("Invalid CORS origin '{o}'"))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            env,
            port,
            database_url: var("DATABASE_URL"),
            cors_origins,
            auth,
        })
    }
}

fn duration(key: &str, value: &str) -> anyhow::Result<Duration> {
    parse_duration(value).with_context(|| format!("{key} must be a duration like 15m or 7d"))
}

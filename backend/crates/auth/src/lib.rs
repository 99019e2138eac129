//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Accounts, value objects, token claims, repository traits
//! - `application/` - Use cases plus the hasher, token issuer and cookie manager
//! - `infra/` - PostgreSQL and in-memory account stores
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Registration and email/password login
//! - Short-lived access token (bearer) and long-lived refresh token (cookie)
//! - Refresh token exchange with configurable rotation
//! - Logout revokes every outstanding token of the account
//!
//! ## Security Model
//! - Passwords hashed with Argon2id on the blocking pool
//! - HS256 tokens with separate access and refresh secrets
//! - Revocation by a per-account token version checked on every use
//! - One 401 body for every credential or token failure
//! - Per-address rate limit on `/auth/*`

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError, RefreshRotation};
pub use application::context::AuthContext;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryAccountRepository, postgres::PgAccountRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::account::*;
    pub use crate::domain::token::*;
    pub use crate::domain::value_object::{
        display_name::DisplayName, email::Email, token_version::TokenVersion,
    };
    pub use crate::presentation::dto::*;
}

pub mod store {
    pub use crate::domain::repository::AccountRepository;
    pub use crate::infra::memory::InMemoryAccountRepository as MemoryStore;
    pub use crate::infra::postgres::PgAccountRepository as AccountStore;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

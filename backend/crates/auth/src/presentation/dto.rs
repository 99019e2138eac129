//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::outcome::AuthOutcome;
use crate::domain::entity::account::AccountView;

// ============================================================================
// Requests
// ============================================================================

/// Register request
///
/// Missing fields deserialize as empty and are reported by validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Token block of an auth response. The refresh token travels only in the
/// cookie.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    /// Access token lifetime, e.g. `15m`
    pub expires_in: String,
}

/// Register, login and refresh response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: AccountView,
    pub tokens: TokensResponse,
}

impl AuthResponse {
    pub fn new(outcome: &AuthOutcome, expires_in: String) -> Self {
        Self {
            user: outcome.account.clone(),
            tokens: TokensResponse {
                access_token: outcome.tokens.access_token.clone(),
                expires_in,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

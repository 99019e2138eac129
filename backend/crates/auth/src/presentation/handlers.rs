//! HTTP Handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{OriginalUri, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use kernel::error::app_error::AppError;
use platform::rate_limit::InMemoryRateLimitStore;

use crate::application::{
    AuthContext, LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput,
    RegisterUseCase,
};
use crate::domain::entity::account::AccountView;
use crate::domain::repository::AccountRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthResponse, HealthResponse, LoginRequest, MessageResponse, RegisterRequest,
};
use crate::presentation::middleware::CurrentAccount;

const LOGOUT_MESSAGE: &str = "Logged out successfully.";

/// Shared state for auth handlers
pub struct AuthAppState<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub ctx: Arc<AuthContext>,
    pub rate_limiter: Arc<InMemoryRateLimitStore>,
}

impl<R> AuthAppState<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    pub fn new(repo: R, ctx: AuthContext) -> Self {
        Self {
            repo: Arc::new(repo),
            ctx: Arc::new(ctx),
            rate_limiter: Arc::new(InMemoryRateLimitStore::new()),
        }
    }
}

impl<R> Clone for AuthAppState<R>
where
    R: AccountRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            ctx: self.ctx.clone(),
            rate_limiter: self.rate_limiter.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let use_case = RegisterUseCase::new(state.repo.clone(), state.ctx.clone());

    let outcome = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    let jar = state.ctx.cookie.attach(
        jar,
        &outcome.tokens.refresh_token,
        outcome.tokens.refresh_expires_at,
    );
    let body = AuthResponse::new(&outcome, state.ctx.config.access_ttl_label());

    Ok((StatusCode::CREATED, jar, Json(body)))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let use_case = LoginUseCase::new(state.repo.clone(), state.ctx.clone());

    let outcome = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let jar = state.ctx.cookie.attach(
        jar,
        &outcome.tokens.refresh_token,
        outcome.tokens.refresh_expires_at,
    );
    let body = AuthResponse::new(&outcome, state.ctx.config.access_ttl_label());

    Ok((StatusCode::OK, jar, Json(body)))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /auth/refresh
///
/// A rejected refresh token is also cleared from the client.
pub async fn refresh<R>(State(state): State<AuthAppState<R>>, jar: CookieJar) -> Response
where
    R: AccountRepository + Send + Sync + 'static,
{
    let token = state.ctx.cookie.read(&jar);
    let use_case = RefreshUseCase::new(state.repo.clone(), state.ctx.clone());

    match use_case.execute(token.as_deref()).await {
        Ok(outcome) => {
            let jar = state.ctx.cookie.attach(
                jar,
                &outcome.tokens.refresh_token,
                outcome.tokens.refresh_expires_at,
            );
            let body = AuthResponse::new(&outcome, state.ctx.config.access_ttl_label());
            (StatusCode::OK, jar, Json(body)).into_response()
        }
        Err(err) if err.is_unauthorized() => (state.ctx.cookie.clear(jar), err).into_response(),
        Err(err) => err.into_response(),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// POST /auth/logout
pub async fn logout<R>(State(state): State<AuthAppState<R>>, jar: CookieJar) -> impl IntoResponse
where
    R: AccountRepository + Send + Sync + 'static,
{
    let token = state.ctx.cookie.read(&jar);
    let use_case = LogoutUseCase::new(state.repo.clone(), state.ctx.clone());

    // Errors are logged inside; logout always succeeds.
    use_case.execute(token.as_deref()).await;

    (
        StatusCode::OK,
        state.ctx.cookie.clear(jar),
        Json(MessageResponse::new(LOGOUT_MESSAGE)),
    )
}

// ============================================================================
// Profile / Health
// ============================================================================

/// GET /user/profile
pub async fn profile(CurrentAccount(account): CurrentAccount) -> Json<AccountView> {
    Json(account)
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Fallback for unmatched routes
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(format!("Route {} {} not found.", method, uri.path()))
}

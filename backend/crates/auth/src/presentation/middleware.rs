//! Auth Middleware
//!
//! Bearer-token guard for protected routes, and the extractor handlers use
//! to read the account it resolved.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::AuthenticateUseCase;
use crate::domain::entity::account::AccountView;
use crate::domain::repository::AccountRepository;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// The authenticated account, inserted by [`require_account`]
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub AccountView);

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}

/// Middleware that requires a valid access token
pub async fn require_account<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AccountRepository + Send + Sync + 'static,
{
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.ctx.clone());
    let account = use_case.execute(authorization.as_deref()).await?;

    req.extensions_mut().insert(CurrentAccount(account));

    Ok(next.run(req).await)
}

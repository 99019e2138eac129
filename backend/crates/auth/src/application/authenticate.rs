//! Authenticate Use Case
//!
//! Resolves `Authorization: Bearer <access token>` to the current account.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::application::store::bounded;
use crate::domain::entity::account::AccountView;
use crate::domain::repository::AccountRepository;
use crate::domain::token::TokenKind;
use crate::error::{AuthError, AuthResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Token part of a bearer `Authorization` value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty() && !token.contains(char::is_whitespace)).then_some(token)
}

/// Authenticate use case
pub struct AuthenticateUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    ctx: Arc<AuthContext>,
}

impl<R> AuthenticateUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, ctx: Arc<AuthContext>) -> Self {
        Self { repo, ctx }
    }

    pub async fn execute(&self, authorization: Option<&str>) -> AuthResult<AccountView> {
        let token = authorization
            .and_then(parse_bearer)
            .ok_or(AuthError::MissingToken)?;

        let verified = self.ctx.issuer.verify(token, TokenKind::Access)?;

        let account = bounded(
            self.ctx.config.store_timeout,
            self.repo.find_by_id(&verified.account_id),
        )
        .await?
        .ok_or(AuthError::AccountNotFound)?;

        if !account.accepts(verified.claims.token_version) {
            return Err(AuthError::TokenVersionMismatch);
        }

        Ok(account.view())
    }
}

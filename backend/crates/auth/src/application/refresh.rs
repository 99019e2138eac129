//! Refresh Use Case
//!
//! Exchanges a valid refresh token for a new pair. The token's version must
//! match the stored one; [`RefreshRotation`] decides whether the exchange
//! also revokes the presented token.

use std::sync::Arc;

use crate::application::config::RefreshRotation;
use crate::application::context::AuthContext;
use crate::application::outcome::AuthOutcome;
use crate::application::store::bounded;
use crate::domain::repository::AccountRepository;
use crate::domain::token::TokenKind;
use crate::error::{AuthError, AuthResult};

/// Refresh use case
pub struct RefreshUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    ctx: Arc<AuthContext>,
}

impl<R> RefreshUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, ctx: Arc<AuthContext>) -> Self {
        Self { repo, ctx }
    }

    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<AuthOutcome> {
        let token = refresh_token.ok_or(AuthError::MissingToken)?;
        let verified = self.ctx.issuer.verify(token, TokenKind::Refresh)?;
        let timeout = self.ctx.config.store_timeout;

        let mut account = bounded(timeout, self.repo.find_by_id(&verified.account_id))
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.accepts(verified.claims.token_version) {
            tracing::info!(
                account_id = %account.account_id,
                presented = %verified.claims.token_version,
                current = %account.token_version,
                "Stale refresh token presented"
            );
            return Err(AuthError::TokenVersionMismatch);
        }

        if self.ctx.config.rotation == RefreshRotation::BumpVersion {
            // Only one exchange of a given token may win the bump.
            account.token_version = bounded(
                timeout,
                self.repo.rotate_token_version(&account.account_id, account.token_version),
            )
            .await?
            .ok_or(AuthError::TokenVersionMismatch)?;
        }

        let tokens = self
            .ctx
            .issuer
            .issue_pair(&account.account_id, account.token_version)?;

        tracing::info!(
            account_id = %account.account_id,
            token_version = %account.token_version,
            "Tokens refreshed"
        );

        Ok(AuthOutcome {
            account: account.view(),
            tokens,
        })
    }
}

//! Logout Use Case
//!
//! Best-effort revocation: a verifiable refresh token bumps its account's
//! token version, which invalidates every pair issued before. Nothing here
//! fails the request.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::application::store::bounded;
use crate::domain::repository::AccountRepository;
use crate::domain::token::TokenKind;
use crate::domain::value_object::token_version::TokenVersion;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    ctx: Arc<AuthContext>,
}

impl<R> LogoutUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, ctx: Arc<AuthContext>) -> Self {
        Self { repo, ctx }
    }

    /// Returns the new token version when a revocation happened.
    pub async fn execute(&self, refresh_token: Option<&str>) -> Option<TokenVersion> {
        let token = refresh_token?;

        match self.revoke(token).await {
            Ok(Some(version)) => Some(version),
            Ok(None) => {
                tracing::debug!("Logout for unknown account");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Logout revocation skipped");
                None
            }
        }
    }

    async fn revoke(&self, token: &str) -> AuthResult<Option<TokenVersion>> {
        let verified = self.ctx.issuer.verify(token, TokenKind::Refresh)?;

        let version = bounded(
            self.ctx.config.store_timeout,
            self.repo.increment_token_version(&verified.account_id),
        )
        .await?;

        if let Some(version) = version {
            tracing::info!(
                account_id = %verified.account_id,
                token_version = %version,
                "Account logged out"
            );
        }

        Ok(version)
    }
}

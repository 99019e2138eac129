//! Login Use Case
//!
//! Verifies email and password. Unknown email and wrong password produce
//! the same error after the same amount of hashing work.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::context::AuthContext;
use crate::application::outcome::AuthOutcome;
use crate::application::store::bounded;
use crate::application::validation::{Violations, presented_password};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    ctx: Arc<AuthContext>,
}

impl<R> LoginUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, ctx: Arc<AuthContext>) -> Self {
        Self { repo, ctx }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<AuthOutcome> {
        let mut violations = Violations::new();
        let email = violations.check(Email::new(&input.email));
        presented_password(&input.password, &mut violations);

        let email = match email {
            Some(email) if violations.is_empty() => email,
            _ => return Err(violations.into_error()),
        };

        // Oversized or control-character input can never match a stored hash.
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let account = bounded(
            self.ctx.config.store_timeout,
            self.repo.find_by_email(&email),
        )
        .await?;

        let verified = self
            .ctx
            .hasher
            .verify(password, account.as_ref().map(|a| &a.password_hash))
            .await?;

        let account = match account {
            Some(account) if verified => account,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let tokens = self
            .ctx
            .issuer
            .issue_pair(&account.account_id, account.token_version)?;

        tracing::info!(account_id = %account.account_id, "Account logged in");

        Ok(AuthOutcome {
            account: account.view(),
            tokens,
        })
    }
}

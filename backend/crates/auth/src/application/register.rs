//! Register Use Case
//!
//! Creates a new account and mints its first token pair at version 0.

use std::sync::Arc;

use crate::application::context::AuthContext;
use crate::application::outcome::AuthOutcome;
use crate::application::store::bounded;
use crate::application::validation::{Violations, new_password};
use crate::domain::entity::account::NewAccount;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{display_name::DisplayName, email::Email};
use crate::error::AuthResult;

/// Register input
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    ctx: Arc<AuthContext>,
}

impl<R> RegisterUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, ctx: Arc<AuthContext>) -> Self {
        Self { repo, ctx }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthOutcome> {
        let mut violations = Violations::new();
        let name = violations.check(DisplayName::new(&input.name));
        let email = violations.check(Email::new(&input.email));
        let password = new_password(input.password, &mut violations);

        let (name, email, password) = match (name, email, password) {
            (Some(name), Some(email), Some(password)) if violations.is_empty() => {
                (name, email, password)
            }
            _ => return Err(violations.into_error()),
        };

        let password_hash = self.ctx.hasher.hash(password).await?;

        // Uniqueness is decided by the store; no pre-check.
        let account = bounded(
            self.ctx.config.store_timeout,
            self.repo.create(NewAccount {
                name,
                email,
                password_hash,
            }),
        )
        .await?;

        let tokens = self
            .ctx
            .issuer
            .issue_pair(&account.account_id, account.token_version)?;

        tracing::info!(account_id = %account.account_id, "Account registered");

        Ok(AuthOutcome {
            account: account.view(),
            tokens,
        })
    }
}

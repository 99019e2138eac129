//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the
//! infrastructure layer.

use kernel::id::AccountId;

use crate::domain::entity::account::{Account, NewAccount};
use crate::domain::value_object::{email::Email, token_version::TokenVersion};
use crate::error::AuthResult;

/// Account repository trait
///
/// `create` and both version bumps must each be atomic with respect
/// to concurrent callers.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Find account by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Find account by ID
    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>>;

    /// Insert a new account.
    ///
    /// Fails with `AuthError::EmailTaken` when the email is already stored.
    async fn create(&self, account: NewAccount) -> AuthResult<Account>;

    /// Bump the token version, returning the new value, or `None` when the
    /// account does not exist.
    async fn increment_token_version(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<TokenVersion>>;

    /// Bump the token version only while it still equals `expected`.
    ///
    /// Returns the new value, or `None` when the account is gone or its
    /// version has already moved on.
    async fn rotate_token_version(
        &self,
        account_id: &AccountId,
        expected: TokenVersion,
    ) -> AuthResult<Option<TokenVersion>>;
}

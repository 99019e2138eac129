//! In-Memory Repository Implementation
//!
//! Used when no database is configured, and by the test-suite. Email
//! uniqueness is checked and claimed under a single write lock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use kernel::id::AccountId;
use tokio::sync::RwLock;

use crate::domain::entity::account::{Account, NewAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{email::Email, token_version::TokenVersion};
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    by_email: HashMap<String, AccountId>,
}

/// In-memory account repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountRepository {
    tables: Arc<RwLock<Tables>>,
    latency: Option<Duration>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency`, to exercise store timeouts.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        self.simulate_latency().await;
        let tables = self.tables.read().await;
        Ok(tables
            .by_email
            .get(email.as_str())
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        self.simulate_latency().await;
        Ok(self.tables.read().await.accounts.get(account_id).cloned())
    }

    async fn create(&self, account: NewAccount) -> AuthResult<Account> {
        self.simulate_latency().await;
        let mut tables = self.tables.write().await;

        if tables.by_email.contains_key(account.email.as_str()) {
            return Err(AuthError::EmailTaken);
        }

        let account = Account::from_new(account);
        tables
            .by_email
            .insert(account.email.as_str().to_string(), account.account_id);
        tables.accounts.insert(account.account_id, account.clone());

        Ok(account)
    }

    async fn increment_token_version(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<TokenVersion>> {
        self.simulate_latency().await;
        let mut tables = self.tables.write().await;

        Ok(tables.accounts.get_mut(account_id).map(|account| {
            account.token_version = account.token_version.next();
            account.token_version
        }))
    }

    async fn rotate_token_version(
        &self,
        account_id: &AccountId,
        expected: TokenVersion,
    ) -> AuthResult<Option<TokenVersion>> {
        self.simulate_latency().await;
        let mut tables = self.tables.write().await;

        Ok(tables
            .accounts
            .get_mut(account_id)
            .filter(|account| account.token_version == expected)
            .map(|account| {
                account.token_version = account.token_version.next();
                account.token_version
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::display_name::DisplayName;
    use platform::password::{ClearTextPassword, HashCost};

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: DisplayName::new("Ann").unwrap(),
            email: Email::new(email).unwrap(),
            password_hash: ClearTextPassword::new("Passw0rd")
                .unwrap()
                .hash(&HashCost::minimal())
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryAccountRepository::new();
        let created = repo.create(new_account("ann@x.com")).await.unwrap();

        let by_email = repo
            .find_by_email(&Email::new("ANN@x.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.account_id, created.account_id);

        let by_id = repo.find_by_id(&created.account_id).await.unwrap().unwrap();
        assert_eq!(by_id.email, created.email);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryAccountRepository::new();
        repo.create(new_account("ann@x.com")).await.unwrap();
        let err = repo.create(new_account(" Ann@X.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_increment_token_version() {
        let repo = InMemoryAccountRepository::new();
        let created = repo.create(new_account("ann@x.com")).await.unwrap();

        let v1 = repo.increment_token_version(&created.account_id).await.unwrap();
        let v2 = repo.increment_token_version(&created.account_id).await.unwrap();
        assert_eq!(v1, Some(TokenVersion::new(1)));
        assert_eq!(v2, Some(TokenVersion::new(2)));

        let stored = repo.find_by_id(&created.account_id).await.unwrap().unwrap();
        assert_eq!(stored.token_version, TokenVersion::new(2));
    }

    #[tokio::test]
    async fn test_increment_unknown_account() {
        let repo = InMemoryAccountRepository::new();
        assert_eq!(
            repo.increment_token_version(&AccountId::new()).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_rotate_requires_expected_version() {
        let repo = InMemoryAccountRepository::new();
        let id = repo.create(new_account("ann@x.com")).await.unwrap().account_id;

        assert_eq!(
            repo.rotate_token_version(&id, TokenVersion::INITIAL).await.unwrap(),
            Some(TokenVersion::new(1))
        );
        // A second rotation from the same starting point loses.
        assert_eq!(
            repo.rotate_token_version(&id, TokenVersion::INITIAL).await.unwrap(),
            None
        );
        assert_eq!(
            repo.rotate_token_version(&AccountId::new(), TokenVersion::INITIAL)
                .await
                .unwrap(),
            None
        );

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.token_version, TokenVersion::new(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rotations_have_one_winner() {
        let repo = InMemoryAccountRepository::new();
        let id = repo.create(new_account("ann@x.com")).await.unwrap().account_id;

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.rotate_token_version(&id, TokenVersion::INITIAL).await
                })
            })
            .collect();

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap().unwrap().is_some() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let repo = InMemoryAccountRepository::new();
        let id = repo.create(new_account("ann@x.com")).await.unwrap().account_id;

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.increment_token_version(&id).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.token_version, TokenVersion::new(32));
    }
}

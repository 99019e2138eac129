//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::account::{Account, NewAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    display_name::DisplayName, email::Email, token_version::TokenVersion,
};
use crate::error::{AuthError, AuthResult};

const ACCOUNT_COLUMNS: &str = "account_id, name, email, password_hash, token_version, created_at";

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1"
        ))
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn create(&self, account: NewAccount) -> AuthResult<Account> {
        // The unique index on email decides races; a skipped insert
        // returns no row.
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (account_id, name, email, password_hash, token_version, created_at)
            VALUES ($1, $2, $3, $4, 0, now())
            ON CONFLICT (email) DO NOTHING
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(account.name.as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(AuthError::EmailTaken)?.into_account()
    }

    async fn increment_token_version(
        &self,
        account_id: &AccountId,
    ) -> AuthResult<Option<TokenVersion>> {
        let version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE accounts
            SET token_version = token_version + 1
            WHERE account_id = $1
            RETURNING token_version
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(version.map(TokenVersion::new))
    }

    async fn rotate_token_version(
        &self,
        account_id: &AccountId,
        expected: TokenVersion,
    ) -> AuthResult<Option<TokenVersion>> {
        let version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE accounts
            SET token_version = token_version + 1
            WHERE account_id = $1 AND token_version = $2
            RETURNING token_version
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(expected.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(version.map(TokenVersion::new))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    token_version: i64,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash).map_err(|e| {
            AuthError::Internal(format!("Stored hash for {} unreadable: {e}", self.account_id))
        })?;

        Ok(Account {
            account_id: AccountId::from_uuid(self.account_id),
            name: DisplayName::from_db(self.name),
            email: Email::from_db(self.email),
            password_hash,
            token_version: TokenVersion::new(self.token_version),
            created_at: self.created_at,
        })
    }
}

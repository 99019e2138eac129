//! Account Entity
//!
//! The stored credential record. The password hash stays inside the domain
//! and store layers; everything returned to clients goes through
//! [`AccountView`].

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use platform::password::HashedPassword;
use serde::Serialize;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, token_version::TokenVersion,
};

/// Account entity
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub name: DisplayName,
    /// Normalized, unique
    pub email: Email,
    pub password_hash: HashedPassword,
    pub token_version: TokenVersion,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Materialize a freshly inserted account.
    pub fn from_new(new: NewAccount) -> Self {
        Self {
            account_id: AccountId::new(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            token_version: TokenVersion::INITIAL,
            created_at: Utc::now(),
        }
    }

    /// Whether a token minted at `version` is still honoured.
    pub fn accepts(&self, version: TokenVersion) -> bool {
        self.token_version == version
    }

    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.account_id,
            name: self.name.as_str().to_string(),
            email: self.email.as_str().to_string(),
            created_at: self.created_at,
        }
    }
}

/// Input to [`AccountRepository::create`](crate::domain::repository::AccountRepository)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: DisplayName,
    pub email: Email,
    pub password_hash: HashedPassword,
}

/// Sanitized projection of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

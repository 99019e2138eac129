//! Credential Hasher
//!
//! Async front for the Argon2id primitives in `platform::password`. Hashing
//! and verification run on the blocking pool.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashCost, HashedPassword, PasswordHashError};

use crate::error::{AuthError, AuthResult};

/// Hashes new passwords and verifies presented ones.
///
/// Holds a dummy digest produced at the configured cost; verifying against
/// it when no account matches keeps unknown-email logins as slow as
/// wrong-password ones.
#[derive(Clone)]
pub struct CredentialHasher {
    cost: HashCost,
    dummy: Arc<HashedPassword>,
}

impl CredentialHasher {
    pub fn new(cost: HashCost) -> Result<Self, PasswordHashError> {
        let filler = ClearTextPassword::new(platform::crypto::random_secret(24))?;
        let dummy = filler.hash(&cost)?;
        Ok(Self {
            cost,
            dummy: Arc::new(dummy),
        })
    }

    pub fn cost(&self) -> HashCost {
        self.cost
    }

    /// Hash with a fresh salt.
    pub async fn hash(&self, password: ClearTextPassword) -> AuthResult<HashedPassword> {
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || password.hash(&cost))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {e}")))??;
        Ok(hashed)
    }

    /// Verify against `digest`, or against the dummy when there is none.
    ///
    /// Returns `false` on mismatch, on a malformed digest and whenever
    /// `digest` is `None`.
    pub async fn verify(
        &self,
        password: ClearTextPassword,
        digest: Option<&HashedPassword>,
    ) -> AuthResult<bool> {
        let has_account = digest.is_some();
        let target = digest.cloned().unwrap_or_else(|| (*self.dummy).clone());

        let matched = tokio::task::spawn_blocking(move || target.verify(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Verification task failed: {e}")))?;

        Ok(has_account && matched)
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("cost", &self.cost)
            .finish_non_exhaustive()
    }
}

//! Store call bounding
//!
//! Every account store call is raced against the configured timeout.

use std::future::Future;
use std::time::Duration;

use crate::error::{AuthError, AuthResult};

/// Run a store call, failing with `StoreTimeout` once `limit` elapses.
pub async fn bounded<T, F>(limit: Duration, call: F) -> AuthResult<T>
where
    F: Future<Output = AuthResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| AuthError::StoreTimeout(limit))?
}

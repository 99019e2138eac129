//! Result of a successful register, login or refresh.

use crate::application::token_issuer::TokenPair;
use crate::domain::entity::account::AccountView;

#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub account: AccountView,
    pub tokens: TokenPair,
}

//! Domain Layer
//!
//! Contains entities, value objects, token claims and repository traits.

pub mod entity;
pub mod repository;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::account::{Account, AccountView, NewAccount};
pub use repository::AccountRepository;
pub use token::{Claims, TokenKind};

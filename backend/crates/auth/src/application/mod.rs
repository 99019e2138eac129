//! Application Layer
//!
//! Use cases and the services they share.

pub mod authenticate;
pub mod config;
pub mod context;
pub mod credential_hasher;
pub mod login;
pub mod logout;
pub mod outcome;
pub mod refresh;
pub mod register;
pub mod session_cookie;
pub mod store;
pub mod token_issuer;
pub mod validation;

// Re-exports
pub use authenticate::AuthenticateUseCase;
pub use config::{AuthConfig, RefreshRotation};
pub use context::AuthContext;
pub use login::{LoginInput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use outcome::AuthOutcome;
pub use refresh::RefreshUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use token_issuer::{TokenError, TokenIssuer, TokenPair};

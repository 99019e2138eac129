//! Platform Crate - Technical Infrastructure
//!
//! Domain-free building blocks shared by the service crates:
//! - Password hashing (Argon2id) and strength policy
//! - Cookie attribute policy on top of `axum-extra` cookies
//! - Fixed-window rate limiting
//! - Client address extraction
//! - Random secret generation
//! - Human duration strings (`15m`, `7d`)

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod duration;
pub mod password;
pub mod rate_limit;

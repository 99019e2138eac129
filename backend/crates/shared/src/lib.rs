//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - [`error::app_error::AppError`], the unified error returned over HTTP
//! - [`error::kind::ErrorKind`], the status classification behind it
//! - [`id::Id`], typed UUID identifiers
//!
//! Only things whose meaning is identical across domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

//! Storefront-local models.
//!
//! Backend records live in [`crate::api::types`]; this module holds the small
//! amount of state the storefront keeps for itself.

pub mod session;

pub use session::{Flash, FlashKind};

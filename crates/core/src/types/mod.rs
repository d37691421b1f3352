//! Core types for Luxe Pay.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod status;

pub use id::*;
pub use money::{Currency, Money};
pub use status::*;

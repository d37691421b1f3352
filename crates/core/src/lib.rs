//! Luxe Pay Core - Shared types library.
//!
//! This crate provides the types shared by the Luxe Pay components:
//! - `storefront` - Server-rendered storefront (products, cart, checkout, history)
//! - `integration-tests` - End-to-end tests against a fake backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every record
//! the storefront displays is owned by the backend; these types only give the
//! wire values names and formatting.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, minor-unit money, and cart/payment statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

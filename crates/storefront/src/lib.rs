//! Luxe Pay storefront library.
//!
//! Server-rendered demo storefront: product grid, cart, checkout through the
//! payment provider's hosted widget, and payment history. All data lives in
//! the backend REST service; this crate only renders it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use app::build_router;

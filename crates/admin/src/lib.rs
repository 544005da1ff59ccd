//! Backoffice admin library.
//!
//! Server-rendered administration panel for the store REST API: products
//! (create, edit, upload and reorder images), orders, and administrator
//! accounts. Sign-in is delegated to an external authentication provider.
//!
//! The crate is a library so the integration tests can build the same
//! router the binary serves.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use app::build_app;
pub use config::AdminConfig;
pub use state::AppState;

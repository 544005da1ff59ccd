//! Backoffice Core - Shared types library.
//!
//! This crate provides common types used across the backoffice components:
//! - `admin` - Server-rendered administration panel
//! - `integration-tests` - End-to-end tests against a fake store API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Documents
//! themselves live in the store API; these types describe the values the
//! admin validates before sending anything back.
//!
//! # Modules
//!
//! - [`types`] - Document ids, emails, prices, and the ordered image list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Core types for the backoffice admin.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod images;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use images::{ImageList, ReorderError};
pub use price::{Price, PriceError};

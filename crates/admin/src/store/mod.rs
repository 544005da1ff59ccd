//! Store REST API integration.
//!
//! This module provides:
//! - [`StoreApi`], the seam controllers are written against
//! - [`StoreClient`], the reqwest implementation used by the server
//! - Wire types for products, categories, orders, and administrators
//!
//! # Endpoints
//!
//! ```text
//! GET    /api/categories          -> [Category]
//! GET    /api/products            -> [Product]
//! GET    /api/products?id={id}    -> Product | null
//! POST   /api/products            create
//! PUT    /api/products            update (body carries _id)
//! POST   /api/upload              multipart, repeated "file" parts -> {links}
//! GET    /api/orders              -> [Order]
//! GET    /api/admins              -> [Administrator]
//! POST   /api/admins              create
//! DELETE /api/admins/{id}
//! ```

use std::future::Future;

use backoffice_core::{AdminId, ProductId};

mod client;
mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::StoreClient;
pub use error::ApiError;
pub use types::{
    Administrator, Category, LineItem, NewAdministrator, Order, Product, ProductPayload,
    UploadFile, UploadResponse,
};

/// Operations the admin panel performs against the store API.
pub trait StoreApi: Send + Sync {
    /// Fetch every category.
    fn list_categories(&self) -> impl Future<Output = Result<Vec<Category>, ApiError>> + Send;

    /// Fetch every product.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// Fetch a single product; `Ok(None)` when the API answers `null`.
    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Option<Product>, ApiError>> + Send;

    /// Create a product (`POST`).
    fn create_product(
        &self,
        payload: &ProductPayload,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Update a product (`PUT`); the payload carries the id.
    fn update_product(
        &self,
        payload: &ProductPayload,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Upload files in one multipart request, returning the hosted URLs in
    /// upload order.
    fn upload_images(
        &self,
        files: Vec<UploadFile>,
    ) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// Fetch every order.
    fn list_orders(&self) -> impl Future<Output = Result<Vec<Order>, ApiError>> + Send;

    /// Fetch every administrator.
    fn list_administrators(
        &self,
    ) -> impl Future<Output = Result<Vec<Administrator>, ApiError>> + Send;

    /// Create an administrator account.
    fn create_administrator(
        &self,
        admin: &NewAdministrator,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Delete an administrator account.
    fn delete_administrator(
        &self,
        id: &AdminId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

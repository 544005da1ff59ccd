//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! # Home
//! GET  /                               - Welcome page
//!
//! # Auth (delegated to the authentication provider)
//! GET  /auth/login                     - Sign-in page
//! GET  /auth/callback                  - Session handoff from the provider
//! POST /auth/logout                    - Sign out
//!
//! # Products
//! GET  /products                       - Product listing
//! GET  /products/new                   - Empty product form
//! GET  /products/{id}/edit             - Product form seeded from the API
//! POST /products/save                  - Create or update
//! POST /products/upload                - Upload images, re-render the form
//! POST /products/images/reorder        - Validate a new image order (JSON)
//!
//! # Orders
//! GET  /orders                         - Order table
//!
//! # Administrators
//! GET  /administrators                 - Administrator table
//! GET  /administrators/new             - Creation form
//! POST /administrators                 - Create administrator
//! GET  /administrators/{id}/delete     - Confirmation dialog
//! POST /administrators/{id}/delete     - Confirmed or cancelled delete
//! ```

use askama::Template;
use axum::{Router, response::Html};

use crate::config::AdminConfig;
use crate::state::AppState;

pub mod administrators;
pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;

pub use dashboard::AdminUserView;

/// Build the page router.
pub fn routes(config: &AdminConfig) -> Router<AppState> {
    Router::new()
        .merge(dashboard::router())
        .merge(auth::router())
        .merge(products::router(config.upload_max_bytes))
        .merge(orders::router())
        .merge(administrators::router())
}

/// Render a template, logging failures and serving a plain error body.
pub(crate) fn render<T: Template>(template: &T) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

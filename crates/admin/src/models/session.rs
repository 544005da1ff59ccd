//! Session-related types for admin authentication.
//!
//! Types stored in the session once the authentication provider has
//! vouched for the browser.

use serde::{Deserialize, Serialize};

/// Display name used when the provider supplies neither name nor email.
const FALLBACK_NAME: &str = "Administrador";

/// Session-stored admin identity.
///
/// Copied from the authentication provider's session at sign-in; handlers
/// receive it through the `RequireAdminAuth` extractor and never look it up
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Display name.
    pub name: String,
    /// Email address, if the provider shares it.
    pub email: Option<String>,
    /// Avatar image URL, if any.
    pub image: Option<String>,
}

impl CurrentAdmin {
    /// Build the identity from provider fields, falling back to the email
    /// (then a generic label) when no name is given.
    #[must_use]
    pub fn from_provider(
        name: Option<String>,
        email: Option<String>,
        image: Option<String>,
    ) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| email.clone())
            .unwrap_or_else(|| FALLBACK_NAME.to_string());

        Self {
            name,
            email,
            image: image.filter(|i| !i.is_empty()),
        }
    }
}

/// Session keys for admin state.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the notice shown on the next rendered page.
    pub const FLASH_NOTICE: &str = "flash_notice";
}

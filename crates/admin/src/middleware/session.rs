//! Session middleware configuration for admin.
//!
//! Sets up in-memory sessions using tower-sessions (SameSite=Lax, 24hr
//! inactivity expiry) and the flash notice carried across redirects.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::AdminConfig;
use crate::models::{Notice, session_keys};

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "backoffice_admin_session";

/// Session expiry time in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with an in-memory store.
///
/// SameSite is `Lax` so the cookie survives the redirect back from the
/// authentication provider.
///
/// `MemoryStore` keeps expired records until the process restarts; memory
/// grows with the number of distinct sessions created since startup.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.uses_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Store a notice to show on the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(
    session: &Session,
    notice: &Notice,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH_NOTICE, notice).await
}

/// Take the pending notice, if any. A broken session yields none.
pub async fn take_flash(session: &Session) -> Option<Notice> {
    session
        .remove::<Notice>(session_keys::FLASH_NOTICE)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to read flash notice"))
        .ok()
        .flatten()
}

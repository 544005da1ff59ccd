//! Authentication provider client.
//!
//! Sign-in happens entirely at the provider. The admin panel only:
//! - sends the browser to the provider's sign-in page
//! - on callback, asks the provider who the browser is, forwarding its
//!   cookies to `GET /api/auth/session`
//! - copies the returned user into its own session as [`CurrentAdmin`]
//!
//! The session document is `{user: {name, email, image}, expires}` for a
//! signed-in browser and `{}` otherwise.

mod error;

pub use error::AuthProviderError;

use reqwest::header::COOKIE;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::models::CurrentAdmin;

/// Session document returned by the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSession {
    #[serde(default)]
    pub user: Option<ProviderUser>,
    #[serde(default)]
    pub expires: Option<String>,
}

/// User block of a provider session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderUser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProviderSession {
    /// The signed-in admin, if the session carries a user.
    #[must_use]
    pub fn into_current_admin(self) -> Option<CurrentAdmin> {
        self.user
            .map(|u| CurrentAdmin::from_provider(u.name, u.email, u.image))
    }
}

/// Client for the authentication provider.
#[derive(Debug, Clone)]
pub struct AuthProvider {
    client: reqwest::Client,
    base_url: Url,
    callback_url: String,
    login_url: String,
}

impl AuthProvider {
    /// Create a provider client.
    ///
    /// `base_url` must end with `/`; `admin_base_url` is the panel's public
    /// URL without trailing slash.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: Url, admin_base_url: &str) -> Self {
        Self {
            client,
            base_url,
            callback_url: format!("{admin_base_url}/auth/callback"),
            login_url: format!("{admin_base_url}/auth/login"),
        }
    }

    /// Provider sign-in page that returns to `/auth/callback`.
    ///
    /// # Errors
    ///
    /// Returns `AuthProviderError::Url` if the URL cannot be built.
    pub fn sign_in_url(&self) -> Result<Url, AuthProviderError> {
        let mut url = self.base_url.join("api/auth/signin")?;
        url.query_pairs_mut()
            .append_pair("callbackUrl", &self.callback_url);
        Ok(url)
    }

    /// Provider sign-out page that returns to `/auth/login`.
    ///
    /// # Errors
    ///
    /// Returns `AuthProviderError::Url` if the URL cannot be built.
    pub fn sign_out_url(&self) -> Result<Url, AuthProviderError> {
        let mut url = self.base_url.join("api/auth/signout")?;
        url.query_pairs_mut()
            .append_pair("callbackUrl", &self.login_url);
        Ok(url)
    }

    /// Ask the provider for the session belonging to `cookie`.
    ///
    /// Returns `Ok(None)` when the browser is not signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthProviderError` if the provider is unreachable, answers
    /// with a non-success status, or sends an unreadable document.
    #[instrument(skip(self, cookie), fields(has_cookie = cookie.is_some()))]
    pub async fn current_session(
        &self,
        cookie: Option<&str>,
    ) -> Result<Option<CurrentAdmin>, AuthProviderError> {
        let url = self.base_url.join("api/auth/session")?;
        let mut request = self.client.get(url);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AuthProviderError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        let session: ProviderSession = if bytes.iter().all(u8::is_ascii_whitespace) {
            ProviderSession::default()
        } else {
            serde_json::from_slice(&bytes).map_err(|e| AuthProviderError::Decode(e.to_string()))?
        };

        let admin = session.into_current_admin();
        debug!(signed_in = admin.is_some(), "Fetched provider session");
        Ok(admin)
    }
}

//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::services::auth::AuthProvider;
use crate::store::{ApiError, StoreClient};

/// Application state shared across all handlers.
///
/// Cheap to clone; every clone points at the same clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    store: StoreClient,
    auth: AuthProvider,
}

impl AppState {
    /// Build the state and its HTTP clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` if an HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, ApiError> {
        let store = StoreClient::new(config.store_api.clone())?;
        let auth = AuthProvider::new(
            reqwest::Client::builder().build()?,
            config.auth_provider_url.clone(),
            &config.base_url,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Store API client.
    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.inner.store
    }

    /// Authentication provider client.
    #[must_use]
    pub fn auth(&self) -> &AuthProvider {
        &self.inner.auth
    }
}

//! Store REST API client.
//!
//! Provides typed access to the store API endpoints used by the admin panel.
//! Every call is a single request; nothing is retried, cached, or
//! deduplicated.

use std::sync::Arc;

use backoffice_core::{AdminId, ProductId};
use reqwest::{Method, RequestBuilder, multipart};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ApiError;
use super::types::{
    Administrator, Category, NewAdministrator, Order, Product, ProductPayload, UploadFile,
    UploadResponse,
};
use super::StoreApi;
use crate::config::StoreApiConfig;

/// Longest error body kept in [`ApiError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Store REST API client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    config: StoreApiConfig,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl StoreClient {
    /// Create a new store API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` if the HTTP client cannot be built.
    pub fn new(config: StoreApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(StoreClientInner { client, config }),
        })
    }

    /// Base URL of the store API.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.config.base_url
    }

    /// Resolve an API path (without leading slash) against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .config
            .base_url
            .join(path)
            .map_err(|e| ApiError::Url(format!("{path}: {e}")))
    }

    /// Start a request, attaching the bearer token when configured.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.inner.client.request(method, url);
        match &self.inner.config.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and decode a JSON body from a 2xx response.
    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check_status(builder.send().await?).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send a request and decode a JSON array, skipping documents that do not
    /// decode so one malformed record cannot hide the rest.
    async fn send_collection<T: DeserializeOwned>(
        builder: RequestBuilder,
        collection: &'static str,
    ) -> Result<Vec<T>, ApiError> {
        let documents: Vec<serde_json::Value> = Self::send_json(builder).await?;
        Ok(decode_documents(documents, collection))
    }

    /// Send a request whose response body is not consumed.
    async fn send_unit(builder: RequestBuilder) -> Result<(), ApiError> {
        Self::check_status(builder.send().await?).await?;
        Ok(())
    }

    /// Turn any non-2xx response into [`ApiError::Status`].
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl StoreApi for StoreClient {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint("api/categories")?;
        let categories: Vec<Category> =
            Self::send_collection(self.request(Method::GET, url), "categories").await?;
        debug!(count = categories.len(), "Fetched categories");
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint("api/products")?;
        Self::send_collection(self.request(Method::GET, url), "products").await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, ApiError> {
        let mut url = self.endpoint("api/products")?;
        url.query_pairs_mut().append_pair("id", id.as_str());
        Self::send_json(self.request(Method::GET, url)).await
    }

    #[instrument(skip(self, payload), fields(title = %payload.title))]
    async fn create_product(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        let url = self.endpoint("api/products")?;
        Self::send_unit(self.request(Method::POST, url).json(payload)).await
    }

    #[instrument(skip(self, payload), fields(product_id = ?payload.id))]
    async fn update_product(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        let url = self.endpoint("api/products")?;
        Self::send_unit(self.request(Method::PUT, url).json(payload)).await
    }

    #[instrument(skip(self, files), fields(files = files.len()))]
    async fn upload_images(&self, files: Vec<UploadFile>) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint("api/upload")?;

        let mut form = multipart::Form::new();
        for file in files {
            let mut part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(content_type) = file.content_type.as_deref() {
                part = part.mime_str(content_type)?;
            }
            form = form.part("file", part);
        }

        let response: UploadResponse =
            Self::send_json(self.request(Method::POST, url).multipart(form)).await?;
        debug!(links = response.links.len(), "Images uploaded");
        Ok(response.links)
    }

    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint("api/orders")?;
        Self::send_collection(self.request(Method::GET, url), "orders").await
    }

    #[instrument(skip(self))]
    async fn list_administrators(&self) -> Result<Vec<Administrator>, ApiError> {
        let url = self.endpoint("api/admins")?;
        Self::send_collection(self.request(Method::GET, url), "administrators").await
    }

    #[instrument(skip(self, admin), fields(email = %admin.email))]
    async fn create_administrator(&self, admin: &NewAdministrator) -> Result<(), ApiError> {
        let url = self.endpoint("api/admins")?;
        Self::send_unit(self.request(Method::POST, url).json(admin)).await
    }

    #[instrument(skip(self), fields(admin_id = %id))]
    async fn delete_administrator(&self, id: &AdminId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("api/admins/{}", id.as_str()))?;
        Self::send_unit(self.request(Method::DELETE, url)).await
    }
}

/// Decode each document on its own, logging and dropping the ones that fail.
fn decode_documents<T: DeserializeOwned>(
    documents: Vec<serde_json::Value>,
    collection: &'static str,
) -> Vec<T> {
    let total = documents.len();
    let decoded: Vec<T> = documents
        .into_iter()
        .enumerate()
        .filter_map(|(index, document)| {
            serde_json::from_value(document)
                .inspect_err(|e| {
                    warn!(collection, index, error = %e, "Skipping undecodable document");
                })
                .ok()
        })
        .collect();

    if decoded.len() < total {
        warn!(collection, skipped = total - decoded.len(), total, "Some documents were skipped");
    }
    decoded
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_documents_skips_only_broken_rows() {
        let orders: Vec<Order> = decode_documents(
            vec![
                json!({"_id": "o1", "name": "Ana", "phone": 5_551_234}),
                json!({"name": "sin id"}),
                json!({"_id": "o3", "name": "Luis", "line_items": null}),
            ],
            "orders",
        );

        let names: Vec<&str> = orders.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Luis"]);
    }

    #[test]
    fn test_decode_documents_empty() {
        let admins: Vec<Administrator> = decode_documents(Vec::new(), "administrators");
        assert!(admins.is_empty());
    }
}

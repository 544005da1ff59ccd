//! Integration tests for the backoffice admin panel.
//!
//! Each test starts two servers on ephemeral ports:
//! - a fake backend implementing the store REST API and the authentication
//!   provider's session endpoint, recording every write it receives
//! - the real admin application, configured against the fake backend
//!
//! and drives the admin with a cookie-enabled `reqwest` client that does not
//! follow redirects, so tests can assert on `Location` headers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p backoffice-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use backoffice_admin::{AdminConfig, AppState, build_app};
use reqwest::{Client, cookie::Jar, redirect::Policy};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Provider cookie the fake backend treats as a signed-in browser.
pub const PROVIDER_COOKIE: &str = "next-auth.session-token=valid-session";

/// A write request received by the fake backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

/// Mutable state of the fake backend.
#[derive(Debug, Default)]
pub struct Backend {
    pub categories: Vec<Value>,
    pub products: Vec<Value>,
    pub orders: Vec<Value>,
    pub admins: Vec<Value>,
    /// Answer every write with `500`.
    pub fail_writes: bool,
    /// Answer every read with `500`.
    pub fail_reads: bool,
    pub writes: Vec<Recorded>,
}

type Shared = Arc<Mutex<Backend>>;

/// Running fake backend plus admin app.
pub struct TestContext {
    pub backend: Shared,
    pub admin_url: String,
    pub client: Client,
}

impl TestContext {
    /// Start both servers with an empty backend.
    pub async fn new() -> Self {
        Self::with_backend(Backend::default()).await
    }

    /// Start both servers with the given backend contents.
    pub async fn with_backend(backend: Backend) -> Self {
        Self::with_env(backend, &[]).await
    }

    /// Start both servers, passing extra environment variables to the admin
    /// configuration.
    pub async fn with_env(backend: Backend, env: &[(&str, &str)]) -> Self {
        let backend = Arc::new(Mutex::new(backend));
        let backend_addr = serve(fake_backend(backend.clone())).await;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let admin_addr = listener.local_addr().unwrap();
        let admin_url = format!("http://{admin_addr}");
        let backend_url = format!("http://{backend_addr}");

        let config = AdminConfig::from_lookup(|key| match key {
            "ADMIN_BASE_URL" => Some(admin_url.clone()),
            "STORE_API_URL" | "AUTH_PROVIDER_URL" => Some(backend_url.clone()),
            _ => env
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_string()),
        })
        .unwrap();
        let app = build_app(AppState::new(config).unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(PROVIDER_COOKIE, &Url::parse(&admin_url).unwrap());
        let client = Client::builder()
            .cookie_provider(jar)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            backend,
            admin_url,
            client,
        }
    }

    /// Absolute admin URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// Complete the provider callback so the client holds an admin session.
    pub async fn sign_in(&self) {
        let response = self
            .client
            .get(self.url("/auth/callback"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }

    /// GET a page and return its status and body.
    pub async fn get_page(&self, path: &str) -> (StatusCode, String) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.text().await.unwrap())
    }

    /// Writes recorded by the fake backend so far.
    #[must_use]
    pub fn writes(&self) -> Vec<Recorded> {
        self.backend.lock().unwrap().writes.clone()
    }

    /// Mutate the fake backend.
    pub fn backend<R>(&self, f: impl FnOnce(&mut Backend) -> R) -> R {
        f(&mut self.backend.lock().unwrap())
    }
}

/// `Location` header of a response.
#[must_use]
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

// =============================================================================
// Fake backend
// =============================================================================

fn fake_backend(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/session", get(session))
        .route("/api/categories", get(categories))
        .route(
            "/api/products",
            get(products).post(create_product).put(update_product),
        )
        .route(
            "/api/upload",
            axum::routing::post(upload).layer(DefaultBodyLimit::disable()),
        )
        .route("/api/orders", get(orders))
        .route("/api/admins", get(admins).post(create_admin))
        .route("/api/admins/{id}", delete(delete_admin))
        .with_state(state)
}

async fn session(headers: HeaderMap) -> Json<Value> {
    let signed_in = headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|c| c.contains(PROVIDER_COOKIE));

    if signed_in {
        Json(json!({
            "user": {
                "name": "Lucía Pérez",
                "email": "lucia@tienda.com",
                "image": "https://img.test/lucia.png"
            },
            "expires": "2099-01-01T00:00:00.000Z"
        }))
    } else {
        Json(json!({}))
    }
}

fn read<F>(state: &Shared, f: F) -> Response
where
    F: FnOnce(&Backend) -> Value,
{
    let backend = state.lock().unwrap();
    if backend.fail_reads {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(f(&backend)).into_response()
}

fn write(state: &Shared, method: &'static str, path: String, body: Value) -> Response {
    let mut backend = state.lock().unwrap();
    backend.writes.push(Recorded { method, path, body });
    if backend.fail_writes {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({"ok": true})).into_response()
}

async fn categories(State(state): State<Shared>) -> Response {
    read(&state, |b| Value::Array(b.categories.clone()))
}

#[derive(Deserialize)]
struct ProductQuery {
    id: Option<String>,
}

async fn products(State(state): State<Shared>, Query(query): Query<ProductQuery>) -> Response {
    read(&state, |b| match query.id {
        Some(id) => b
            .products
            .iter()
            .find(|p| p["_id"] == id.as_str())
            .cloned()
            .unwrap_or(Value::Null),
        None => Value::Array(b.products.clone()),
    })
}

async fn create_product(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    write(&state, "POST", "/api/products".to_string(), body)
}

async fn update_product(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    write(&state, "PUT", "/api/products".to_string(), body)
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut names = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            names.push(field.file_name().unwrap_or_default().to_string());
        }
    }

    let response = write(&state, "POST", "/api/upload".to_string(), json!(names));
    if response.status() != StatusCode::OK {
        return response;
    }
    let links: Vec<String> = names
        .iter()
        .map(|n| format!("https://cdn.test/{n}"))
        .collect();
    Json(json!({ "links": links })).into_response()
}

async fn orders(State(state): State<Shared>) -> Response {
    read(&state, |b| Value::Array(b.orders.clone()))
}

async fn admins(State(state): State<Shared>) -> Response {
    read(&state, |b| Value::Array(b.admins.clone()))
}

async fn create_admin(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    write(&state, "POST", "/api/admins".to_string(), body)
}

async fn delete_admin(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let response = write(&state, "DELETE", format!("/api/admins/{id}"), Value::Null);
    if response.status() == StatusCode::OK {
        state
            .lock()
            .unwrap()
            .admins
            .retain(|a| a["_id"] != id.as_str());
    }
    response
}

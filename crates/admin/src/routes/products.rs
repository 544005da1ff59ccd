//! Product route handlers.
//!
//! The form posts every field (including the current image list as repeated
//! hidden `images` inputs) on each action, so the handlers rebuild a
//! [`ProductForm`] per request and render whatever state it ends in.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use backoffice_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, instrument};

use super::{AdminUserView, render};
use crate::{
    error::AppError,
    filters,
    middleware::{RequireAdminAuth, set_flash, take_flash},
    models::Notice,
    services::{
        CategoryOption, ProductForm, ProductInput, ProductsPage, SaveOutcome, load_categories,
    },
    state::AppState,
    store::{Product, StoreApi, UploadFile},
};

// =============================================================================
// Views
// =============================================================================

/// Product row for the listing table.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub image_count: usize,
    pub thumbnail: Option<String>,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            price: display_price(&product.price),
            image_count: product.images.len(),
            thumbnail: product.images.first().cloned(),
        }
    }
}

/// `$ 12.50` when the stored text is a price, the raw text otherwise.
fn display_price(raw: &str) -> String {
    Price::parse(raw).map_or_else(|_| raw.to_string(), |price| price.to_string())
}

/// Product form view.
#[derive(Debug, Clone)]
pub struct ProductFormView {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub price: String,
    pub images: Vec<String>,
    pub categories: Vec<CategoryOption>,
}

impl ProductFormView {
    fn new(form: &ProductForm, categories: Vec<CategoryOption>) -> Self {
        Self {
            id: form.id().map(ToString::to_string),
            title: form.title().to_string(),
            description: form.description().to_string(),
            price: form.price().to_string(),
            images: form.images().as_slice().to_vec(),
            categories,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub products: Vec<ProductRowView>,
    pub notice: Option<Notice>,
}

/// Product form template (new and edit).
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub heading: String,
    pub form: ProductFormView,
    pub notice: Option<Notice>,
}

/// Load the categories and render the form in its current state.
async fn render_form<A: StoreApi>(
    api: &A,
    admin: AdminUserView,
    form: &ProductForm,
) -> Html<String> {
    let categories = load_categories(api).await;
    let heading = if form.id().is_some() {
        "Editar producto"
    } else {
        "Nuevo producto"
    };

    render(&ProductFormTemplate {
        admin_user: admin,
        current_path: "/products".to_string(),
        heading: heading.to_string(),
        form: ProductFormView::new(form, form.category_options(&categories)),
        notice: form.notice().cloned(),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Build the products router. Upload bodies are capped at `upload_max_bytes`.
pub fn router(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/products", get(index))
        .route("/products/new", get(new_product))
        .route("/products/{id}/edit", get(edit_product))
        .route("/products/save", post(save))
        .route(
            "/products/upload",
            post(upload).layer(DefaultBodyLimit::max(upload_max_bytes)),
        )
        .route("/products/images/reorder", post(reorder))
}

/// Product listing.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let page = ProductsPage::load(state.store()).await;

    render(&ProductsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/products".to_string(),
        products: page.products().iter().map(ProductRowView::from).collect(),
        notice: take_flash(&session).await,
    })
}

/// Empty form for a new product.
#[instrument(skip(admin, state))]
pub async fn new_product(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
) -> Html<String> {
    render_form(state.store(), AdminUserView::from(&admin), &ProductForm::new()).await
}

/// Form seeded from an existing product.
///
/// The form cannot start without its snapshot, so a failed load is an error
/// page rather than an empty form.
#[instrument(skip(admin, state))]
pub async fn edit_product(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = ProductId::parse(&id).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let product = state
        .store()
        .get_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let form = ProductForm::from_product(&product);
    Ok(render_form(state.store(), AdminUserView::from(&admin), &form).await)
}

/// Save the product and go back to the listing, or re-render on failure.
#[instrument(skip(admin, state, session, fields))]
pub async fn save(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let input = ProductInput::from_pairs(fields);
    let mut form =
        ProductForm::from_input(input).map_err(|e| AppError::BadRequest(e.to_string()))?;

    match form.save(state.store()).await {
        SaveOutcome::Saved(navigation) => {
            if let Some(notice) = form.notice() {
                set_flash(&session, notice).await?;
            }
            Ok(Redirect::to(navigation.path()).into_response())
        }
        SaveOutcome::Failed => {
            Ok(render_form(state.store(), AdminUserView::from(&admin), &form)
                .await
                .into_response())
        }
    }
}

/// Fields and files read from an upload request.
#[derive(Debug, Default)]
struct UploadRequest {
    fields: Vec<(String, String)>,
    files: Vec<UploadFile>,
    /// Set when the body could not be read to the end; whatever was read
    /// before the failure is kept.
    error: Option<MultipartError>,
}

/// Read every part of the upload request, stopping at the first part that
/// cannot be read (for example once the body limit is exceeded).
async fn read_upload(mut multipart: Multipart) -> UploadRequest {
    let mut request = UploadRequest::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                request.error = Some(e);
                break;
            }
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = match field.bytes().await {
                Ok(bytes) => bytes,
                Err(e) => {
                    request.error = Some(e);
                    break;
                }
            };

            // An empty file input still submits one nameless, empty part
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            request.files.push(UploadFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            match field.text().await {
                Ok(value) => request.fields.push((name, value)),
                Err(e) => {
                    request.error = Some(e);
                    break;
                }
            }
        }
    }

    request
}

/// Upload the selected files and re-render the form with the new images.
///
/// A body that cannot be read in full (too large, cut off) is an upload
/// failure: nothing is sent to the store and the form comes back with the
/// fields read so far and the error modal.
#[instrument(skip(admin, state, multipart))]
pub async fn upload(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let request = read_upload(multipart).await;
    debug!(
        files = request.files.len(),
        complete = request.error.is_none(),
        "Received upload"
    );

    let mut form = ProductForm::from_input(ProductInput::from_pairs(request.fields))
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let _ = match request.error {
        Some(e) => form.reject_upload(&e.body_text()),
        None => form.upload_images(state.store(), request.files).await,
    };

    Ok(render_form(state.store(), AdminUserView::from(&admin), &form).await)
}

/// Body of the reorder request.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Images the form currently holds.
    pub images: Vec<String>,
    /// Proposed new order.
    pub order: Vec<String>,
}

/// Answer to a reorder request.
#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validate a drag-and-drop reorder.
///
/// Answers the accepted order, or `422` with the unchanged order when the
/// proposal is not a permutation of the current images. Nothing is sent to
/// the store; the order is persisted by the next save.
#[instrument(skip(_admin, request))]
pub async fn reorder(
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(request): Json<ReorderRequest>,
) -> (StatusCode, Json<ReorderResponse>) {
    let mut form = ProductForm::with_images(request.images);

    match form.reorder_images(request.order) {
        Ok(()) => (
            StatusCode::OK,
            Json(ReorderResponse {
                images: form.images().as_slice().to_vec(),
                error: None,
            }),
        ),
        Err(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ReorderResponse {
                images: form.images().as_slice().to_vec(),
                error: Notice::reorder_rejected().text,
            }),
        ),
    }
}

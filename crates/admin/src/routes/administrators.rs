//! Administrator route handlers.
//!
//! Deletion is two requests: the confirmation page, then a form post that
//! answers it. Results travel to the table as a flash notice.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use backoffice_core::AdminId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{AdminUserView, render};
use crate::{
    error::AppError,
    filters,
    middleware::{RequireAdminAuth, set_flash, take_flash},
    models::{ConfirmDialog, Notice},
    services::{AdministratorForm, AdministratorsPage, Confirmation, CreateOutcome},
    state::AppState,
    store::Administrator,
};

/// Administrator row for the table.
#[derive(Debug, Clone)]
pub struct AdministratorRowView {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Administrator> for AdministratorRowView {
    fn from(admin: &Administrator) -> Self {
        Self {
            id: admin.id.to_string(),
            name: admin.name.clone(),
            email: admin.email.clone(),
        }
    }
}

/// Administrators table template.
#[derive(Template)]
#[template(path = "administrators/index.html")]
pub struct AdministratorsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub administrators: Vec<AdministratorRowView>,
    pub notice: Option<Notice>,
}

/// Creation form template.
#[derive(Template)]
#[template(path = "administrators/new.html")]
pub struct NewAdministratorTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub name: String,
    pub email: String,
    pub notice: Option<Notice>,
}

/// Delete confirmation template.
#[derive(Template)]
#[template(path = "administrators/confirm_delete.html")]
pub struct ConfirmDeleteTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub admin_id: String,
    pub dialog: ConfirmDialog,
}

/// Fields of the creation form.
#[derive(Debug, Deserialize)]
pub struct CreateAdministratorForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Answer of the confirmation form.
#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: String,
}

fn parse_admin_id(raw: &str) -> Result<AdminId, AppError> {
    AdminId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Build the administrators router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/administrators", get(index).post(create))
        .route("/administrators/new", get(new_administrator))
        .route(
            "/administrators/{id}/delete",
            get(confirm_delete).post(delete),
        )
}

/// Administrator table.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Html<String> {
    let page = AdministratorsPage::load(state.store()).await;

    render(&AdministratorsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/administrators".to_string(),
        administrators: page
            .administrators()
            .iter()
            .map(AdministratorRowView::from)
            .collect(),
        notice: take_flash(&session).await,
    })
}

/// Empty creation form.
#[instrument(skip(admin))]
pub async fn new_administrator(RequireAdminAuth(admin): RequireAdminAuth) -> Html<String> {
    render(&NewAdministratorTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/administrators".to_string(),
        name: String::new(),
        email: String::new(),
        notice: None,
    })
}

/// Create an administrator; re-renders the form with the typed values when
/// validation or the request fails.
#[instrument(skip(admin, state, session, input))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(input): Form<CreateAdministratorForm>,
) -> Result<Response, AppError> {
    let mut form = AdministratorForm::new(input.name, input.email);

    if form.submit(state.store()).await == CreateOutcome::Created {
        if let Some(notice) = form.notice() {
            set_flash(&session, notice).await?;
        }
        return Ok(Redirect::to("/administrators").into_response());
    }

    let notice = form.notice().cloned();
    Ok(render(&NewAdministratorTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/administrators".to_string(),
        name: form.name,
        email: form.email,
        notice,
    })
    .into_response())
}

/// Confirmation dialog; makes no store request.
#[instrument(skip(admin))]
pub async fn confirm_delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_admin_id(&id)?;
    let mut page = AdministratorsPage::default();
    let dialog = page.request_delete(id.clone());

    Ok(render(&ConfirmDeleteTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/administrators".to_string(),
        admin_id: id.to_string(),
        dialog,
    }))
}

/// Resolve the confirmation: delete on `confirm=yes`, otherwise go back.
#[instrument(skip(_admin, state, session, answer))]
pub async fn delete(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(answer): Form<ConfirmForm>,
) -> Result<Redirect, AppError> {
    let id = parse_admin_id(&id)?;
    let mut page = AdministratorsPage::default();
    let _ = page.request_delete(id);

    let outcome = page
        .resolve_delete(state.store(), Confirmation::from_form_value(&answer.confirm))
        .await;
    tracing::debug!(?outcome, "Delete resolved");

    if let Some(notice) = page.take_notice() {
        set_flash(&session, &notice).await?;
    }
    Ok(Redirect::to("/administrators"))
}

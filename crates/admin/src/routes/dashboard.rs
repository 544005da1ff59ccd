//! Home page route handler.

use askama::Template;
use axum::{Router, response::Html, routing::get};
use tower_sessions::Session;
use tracing::instrument;

use super::render;
use crate::{
    filters,
    middleware::{auth::RequireAdminAuth, take_flash},
    models::{CurrentAdmin, Notice},
    state::AppState,
};

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub image: Option<String>,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.clone().unwrap_or_default(),
            image: admin.image.clone(),
        }
    }
}

/// Home page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub notice: Option<Notice>,
}

/// Build the home router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

/// Welcome page addressed to the signed-in admin.
#[instrument(skip(admin, session))]
pub async fn dashboard(RequireAdminAuth(admin): RequireAdminAuth, session: Session) -> Html<String> {
    let template = DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: "/".to_string(),
        notice: take_flash(&session).await,
    };
    render(&template)
}

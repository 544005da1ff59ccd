//! Authentication route handlers for admin.
//!
//! Sign-in is delegated to the authentication provider; these handlers only
//! hand the browser over and copy the provider's answer into the session.

use askama::Template;
use axum::{
    Router,
    extract::State,
    http::{HeaderMap, header::COOKIE},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use super::render;
use crate::{
    error::{AppError, clear_sentry_user, set_sentry_user},
    middleware::{clear_current_admin, set_current_admin},
    models::{CurrentAdmin, session_keys},
    state::AppState,
};

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginPageTemplate {
    pub sign_in_url: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page))
        .route("/auth/callback", get(callback))
        .route("/auth/logout", post(logout))
}

/// Render the login page, or go home when already signed in.
///
/// GET /auth/login
#[instrument(skip(state, session))]
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let signed_in = session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?
        .is_some();
    if signed_in {
        return Ok(Redirect::to("/").into_response());
    }

    let sign_in_url = state.auth().sign_in_url()?;
    Ok(render(&LoginPageTemplate {
        sign_in_url: sign_in_url.to_string(),
    })
    .into_response())
}

/// Ask the provider who the browser is and start an admin session.
///
/// GET /auth/callback
#[instrument(skip(state, session, headers))]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    let cookie = headers.get(COOKIE).and_then(|v| v.to_str().ok());

    let Some(admin) = state.auth().current_session(cookie).await? else {
        warn!("Provider reported no signed-in user");
        return Ok(Redirect::to("/auth/login"));
    };

    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.name, admin.email.as_deref());
    info!(name = %admin.name, "Admin signed in");

    Ok(Redirect::to("/"))
}

/// Logout, clear the session, and sign out at the provider.
///
/// POST /auth/logout
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Redirect, AppError> {
    clear_current_admin(&session).await?;
    clear_sentry_user();

    let sign_out_url = state.auth().sign_out_url()?;
    Ok(Redirect::to(sign_out_url.as_str()))
}

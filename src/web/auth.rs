use anyhow::Context;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{info, warn};

use super::flash::{Flash, Flashes};
use super::{page_context, pages, AppError, AppState};
use crate::auth::{cookie_value, verify_admin_password, Viewer, SESSION_COOKIE};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_post))
        .route("/logout", get(logout))
}

/// Login form data.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    password: String,
}

/// GET /login - Show login form.
async fn login_page(State(state): State<AppState>, viewer: Viewer, flashes: Flashes) -> Response {
    if viewer.is_admin {
        return Redirect::to("/admin").into_response();
    }

    let ctx = page_context(&state, viewer, &flashes);
    flashes.page(pages::render_login(&ctx))
}

/// POST /login - Check the admin password and start a session.
async fn login_post(
    State(state): State<AppState>,
    viewer: Viewer,
    mut flashes: Flashes,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if !verify_admin_password(&form.password, &state.config.admin_password) {
        warn!("Failed admin login attempt");
        flashes.push(Flash::danger("Wrong password."));
        let ctx = page_context(&state, viewer, &flashes);
        return Ok(flashes.page(pages::render_login(&ctx)));
    }

    let token = state.sessions.create_admin_session().await?;
    let cookie = HeaderValue::from_str(&state.sessions.session_cookie(&token))
        .context("Session cookie is not a valid header value")?;

    info!("Admin logged in");

    let mut response =
        Flash::success("Logged in.").redirect("/admin", state.config.secure_cookies);
    response.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(response)
}

/// GET /logout - End the admin session.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AppError> {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE).filter(|t| !t.is_empty()) {
        state.sessions.destroy(token).await?;
        info!("Admin logged out");
    }

    let clear = HeaderValue::from_str(&state.sessions.clear_cookie())
        .context("Session cookie is not a valid header value")?;

    let mut response = Flash::info("Logged out.").redirect("/", state.config.secure_cookies);
    response.headers_mut().append(header::SET_COOKIE, clear);
    Ok(response)
}

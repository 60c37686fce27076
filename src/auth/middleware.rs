use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use tracing::warn;

use super::session::{SessionManager, SESSION_COOKIE};

/// Read the value of cookie `name` from the request headers.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            (key == name).then_some(value)
        })
}

/// Who is making the request.
/// Use this extractor when admin access is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer {
    pub is_admin: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
    SessionManager: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = cookie_value(&parts.headers, SESSION_COOKIE).filter(|t| !t.is_empty())
        else {
            return Ok(Self::default());
        };

        let sessions = SessionManager::from_ref(state);
        let is_admin = match sessions.is_admin(token).await {
            Ok(is_admin) => is_admin,
            Err(e) => {
                // Storage trouble degrades to an anonymous visitor.
                warn!("Failed to resolve session: {e:#}");
                false
            }
        };

        Ok(Self { is_admin })
    }
}

/// Proof that the caller holds the admin capability.
/// Redirects to `/login` otherwise.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    SessionManager: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let viewer = match Viewer::from_request_parts(parts, state).await {
            Ok(viewer) => viewer,
            Err(never) => match never {},
        };

        if viewer.is_admin {
            Ok(Self)
        } else {
            Err(Redirect::to("/login").into_response())
        }
    }
}

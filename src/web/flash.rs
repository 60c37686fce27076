//! One-shot notices carried across a redirect in a cookie.
//!
//! A handler that redirects attaches its notice with [`Flash::redirect`]. The
//! next page rendered through [`Flashes::page`] shows it and clears the cookie.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    response::{Html, IntoResponse, Redirect, Response},
};
use maud::Markup;
use serde::{Deserialize, Serialize};

use crate::auth::cookie_value;
use crate::config::Config;

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Danger,
}

/// A single notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub text: String,
}

impl Flash {
    #[must_use]
    pub fn new(level: FlashLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Success, text)
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Info, text)
    }

    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Warning, text)
    }

    #[must_use]
    pub fn danger(text: impl Into<String>) -> Self {
        Self::new(FlashLevel::Danger, text)
    }

    /// Redirect to `to`, leaving this notice for the next page.
    #[must_use]
    pub fn redirect(self, to: &str, secure: bool) -> Response {
        redirect_with(&[self], to, secure)
    }
}

/// Redirect to `to`, leaving every notice in `flashes` for the next page.
#[must_use]
pub fn redirect_with(flashes: &[Flash], to: &str, secure: bool) -> Response {
    let payload = serde_json::to_string(flashes).unwrap_or_default();
    let cookie = format!(
        "{FLASH_COOKIE}={}; HttpOnly;{} SameSite=Lax; Path=/",
        urlencoding::encode(&payload),
        secure_attr(secure)
    );

    ([(header::SET_COOKIE, cookie)], Redirect::to(to)).into_response()
}

/// Notices left by the previous response.
#[derive(Debug, Clone, Default)]
pub struct Flashes {
    pub messages: Vec<Flash>,
    secure: bool,
}

impl Flashes {
    /// Decode the flash cookie value. Malformed cookies yield no notices.
    #[must_use]
    pub fn decode(raw: &str) -> Vec<Flash> {
        urlencoding::decode(raw)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Add a notice produced by the current request.
    pub fn push(&mut self, flash: Flash) {
        self.messages.push(flash);
    }

    /// Render `markup` as a page, consuming the pending notices.
    #[must_use]
    pub fn page(&self, markup: Markup) -> Response {
        let html = Html(markup.into_string());
        if self.messages.is_empty() {
            return html.into_response();
        }

        let clear = format!(
            "{FLASH_COOKIE}=; HttpOnly;{} SameSite=Lax; Path=/; Max-Age=0",
            secure_attr(self.secure)
        );
        ([(header::SET_COOKIE, clear)], html).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flashes
where
    S: Send + Sync,
    Arc<Config>: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let secure = Arc::<Config>::from_ref(state).secure_cookies;
        let messages = cookie_value(&parts.headers, FLASH_COOKIE)
            .map(Self::decode)
            .unwrap_or_default();

        Ok(Self { messages, secure })
    }
}

const fn secure_attr(secure: bool) -> &'static str {
    if secure {
        " Secure;"
    } else {
        ""
    }
}

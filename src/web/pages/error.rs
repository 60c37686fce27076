use axum::http::StatusCode;
use maud::{html, Markup, DOCTYPE};

/// Standalone error page. Rendered without the site layout since it may be
/// produced where no request context is available.
#[must_use]
pub fn render_error(status: StatusCode, message: &str) -> Markup {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { (code) " " (reason) }
                link rel="stylesheet" href="/static/css/style.css";
            }
            body {
                main class="container" {
                    h1 { (code) " " (reason) }
                    p { (message) }
                    p { a href="/" { "Back to home" } }
                }
            }
        }
    }
}

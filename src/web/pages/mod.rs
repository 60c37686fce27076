//! Maud-based page templates for the web UI.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod admin;
pub mod auth;
pub mod error;
pub mod feedback;
pub mod home;
pub mod post;

use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::auth::Viewer;
use crate::components::BaseLayout;
use crate::web::flash::Flash;

pub use admin::{render_dashboard, render_feedbacks, render_post_form, PostFormMode};
pub use auth::render_login;
pub use error::render_error;
pub use feedback::render_feedback_form;
pub use home::render_home;
pub use post::render_post;

/// What every page needs besides its own content.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub site_name: &'a str,
    pub viewer: Viewer,
    pub flashes: &'a [Flash],
}

impl<'a> PageContext<'a> {
    fn layout<'b>(&self, title: &'b str) -> BaseLayout<'b>
    where
        'a: 'b,
    {
        BaseLayout::new(title, self.site_name, self.viewer).with_flashes(self.flashes)
    }
}

/// Format a timestamp for display, e.g. "14 Mar 2024".
fn display_date(at: &DateTime<Utc>) -> String {
    at.format("%-d %b %Y").to_string()
}

/// Render plain text as paragraphs split on blank lines, keeping single line breaks.
fn paragraphs(text: &str) -> Markup {
    html! {
        @for block in text.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
            p {
                @for (i, line) in block.lines().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        }
    }
}

/// First `max_chars` characters of `text`, with an ellipsis if cut.
fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}\u{2026}", head.trim_end())
    } else {
        head
    }
}

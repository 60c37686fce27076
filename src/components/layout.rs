//! Base layout for every page: head, navigation, flashed notices and footer.

use maud::{html, Markup, DOCTYPE};

use super::alert::Alert;
use crate::auth::Viewer;
use crate::web::flash::Flash;

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello" } };
/// let page = BaseLayout::new("Home", "Khamsa Travels", viewer)
///     .with_flashes(&flashes.messages)
///     .render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    site_name: &'a str,
    viewer: Viewer,
    flashes: &'a [Flash],
}

impl<'a> BaseLayout<'a> {
    /// The viewer is required so navigation always reflects admin state.
    #[must_use]
    pub const fn new(title: &'a str, site_name: &'a str, viewer: Viewer) -> Self {
        Self {
            title,
            site_name,
            viewer,
            flashes: &[],
        }
    }

    /// Show these notices above the page content.
    #[must_use]
    pub const fn with_flashes(mut self, flashes: &'a [Flash]) -> Self {
        self.flashes = flashes;
        self
    }

    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " - " (self.site_name) }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    (self.render_header())
                    main class="container" {
                        @for flash in self.flashes {
                            (Alert::from(flash))
                        }
                        (content)
                    }
                    (self.render_footer())
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        html! {
            header class="container" {
                nav {
                    ul {
                        li {
                            a href="/" { strong class="site-logo" { (self.site_name) } }
                        }
                    }
                    ul {
                        li { a href="/" { "Home" } }
                        li { a href="/feedback" { "Feedback" } }
                        @if self.viewer.is_admin {
                            li { a href="/admin" { "Admin" } }
                            li { a href="/admin/new" { "New post" } }
                            li { a href="/admin/feedbacks" { "Feedbacks" } }
                            li { a href="/logout" { "Logout" } }
                        } @else {
                            li { a href="/login" { "Login" } }
                        }
                    }
                }
            }
        }
    }

    fn render_footer(&self) -> Markup {
        html! {
            footer class="container" {
                small { (self.site_name) }
            }
        }
    }
}

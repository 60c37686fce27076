//! Pagination component for navigating through multi-page listings.

use maud::{html, Markup, Render};
use urlencoding::encode;

/// Previous / numbered / next page links.
///
/// Pages are 1-indexed. Renders nothing when there is at most one page.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    /// Base URL for page links (query params will be appended)
    pub base_url: String,
    /// Search query to preserve in links
    pub query: Option<String>,
}

impl Pagination {
    #[must_use]
    pub fn new(current_page: usize, total_pages: usize, base_url: &str) -> Self {
        Self {
            current_page,
            total_pages,
            base_url: base_url.to_string(),
            query: None,
        }
    }

    /// Keep the search query `q` on every page link.
    #[must_use]
    pub fn with_query(mut self, query: Option<&str>) -> Self {
        self.query = query.filter(|q| !q.is_empty()).map(String::from);
        self
    }

    fn build_url(&self, page_num: usize) -> String {
        let mut params = Vec::new();

        if let Some(ref q) = self.query {
            params.push(format!("q={}", encode(q)));
        }
        if page_num > 1 {
            params.push(format!("page={page_num}"));
        }

        if params.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}?{}", self.base_url, params.join("&"))
        }
    }

    #[must_use]
    pub const fn should_display(&self) -> bool {
        self.total_pages > 1
    }
}

impl Render for Pagination {
    fn render(&self) -> Markup {
        if !self.should_display() {
            return html! {};
        }

        let current = self.current_page;
        let total = self.total_pages;

        html! {
            nav class="pagination" aria-label="Pagination" {
                @if current > 1 {
                    a href=(self.build_url(current - 1)) rel="prev" { "\u{00ab} Newer" }
                } @else {
                    span class="disabled" { "\u{00ab} Newer" }
                }

                @for page_num in 1..=total {
                    @if page_num == current {
                        span class="current" aria-current="page" { (page_num) }
                    } @else {
                        a href=(self.build_url(page_num)) { (page_num) }
                    }
                }

                @if current < total {
                    a href=(self.build_url(current + 1)) rel="next" { "Older \u{00bb}" }
                } @else {
                    span class="disabled" { "Older \u{00bb}" }
                }
            }
        }
    }
}

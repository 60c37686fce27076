//! Home page: search box, post cards and pagination.

use maud::{html, Markup};

use super::{display_date, excerpt, PageContext};
use crate::components::{Alert, Button, Form, Input, Pagination};
use crate::posts::{Page, Post};

const EXCERPT_CHARS: usize = 220;

/// Render one page of the post listing.
#[must_use]
pub fn render_home(ctx: &PageContext<'_>, page: &Page<Post>, query: Option<&str>) -> Markup {
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let content = html! {
        section class="search" {
            (Form::get("/", html! {
                div role="group" {
                    (Input::search("q").value(query.unwrap_or_default()).placeholder("Search posts"))
                    (Button::primary("Search"))
                }
            }))
        }

        @if let Some(q) = query {
            p class="search-summary" {
                (page.total) " result" @if page.total != 1 { "s" } " for \u{201c}" (q) "\u{201d}"
            }
        }

        @if page.items.is_empty() {
            (Alert::info(if query.is_some() { "No posts match your search." } else { "No posts yet." }))
        } @else {
            div class="post-grid" {
                @for post in &page.items {
                    (post_card(post))
                }
            }
        }

        (Pagination::new(page.page, page.last_page, "/").with_query(query))
    };

    ctx.layout("Home").render(content)
}

fn post_card(post: &Post) -> Markup {
    let href = format!("/post/{}", post.slug);
    html! {
        article class="post-card" {
            @if let Some(cover) = post.cover_image() {
                a href=(href) {
                    img class="cover" src=(format!("/static/uploads/{cover}")) alt=(post.title) loading="lazy";
                }
            }
            header {
                h2 { a href=(href) { (post.title) } }
                small {
                    time datetime=(post.created_at.to_rfc3339()) { (display_date(&post.created_at)) }
                    @if !post.published {
                        " \u{b7} " mark { "Draft" }
                    }
                }
            }
            p { (excerpt(&post.content, EXCERPT_CHARS)) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Viewer;
    use crate::posts::paginate;
    use chrono::{TimeZone, Utc};

    fn post(id: u64, title: &str, published: bool) -> Post {
        Post {
            id,
            title: title.to_string(),
            slug: format!("post-{id}"),
            content: "Dunes at sunrise over Merzouga.".to_string(),
            cover_image: String::new(),
            published,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn ctx() -> PageContext<'static> {
        PageContext {
            site_name: "Khamsa Travels",
            viewer: Viewer::default(),
            flashes: &[],
        }
    }

    #[test]
    fn test_empty_listing() {
        let html = render_home(&ctx(), &paginate(Vec::<Post>::new(), 1, 6), None).into_string();
        assert!(html.contains("No posts yet."));
        assert!(!html.contains("class=\"pagination\""));
    }

    #[test]
    fn test_cards_link_to_slug() {
        let mut with_cover = post(2, "Sahara", true);
        with_cover.cover_image = "abc.png".to_string();
        let page = paginate(vec![with_cover, post(1, "Atlas", false)], 1, 6);

        let html = render_home(&ctx(), &page, None).into_string();
        assert!(html.contains(r#"href="/post/post-2""#));
        assert!(html.contains(r#"src="/static/uploads/abc.png""#));
        assert!(html.contains("Draft"));
    }

    #[test]
    fn test_search_summary() {
        let page = paginate(vec![post(1, "Atlas", true)], 1, 6);
        let html = render_home(&ctx(), &page, Some(" atlas ")).into_string();
        assert!(html.contains("1 result for \u{201c}atlas\u{201d}"));
        assert!(html.contains(r#"value="atlas""#));
    }
}

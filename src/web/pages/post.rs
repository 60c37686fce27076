//! Single post page.

use maud::{html, Markup};

use super::{display_date, paragraphs, PageContext};
use crate::components::Button;
use crate::posts::Post;

#[must_use]
pub fn render_post(ctx: &PageContext<'_>, post: &Post) -> Markup {
    let edit_href = format!("/admin/edit/{}", post.id);

    let content = html! {
        article class="post" {
            header {
                h1 { (post.title) }
                p {
                    small {
                        time datetime=(post.created_at.to_rfc3339()) { (display_date(&post.created_at)) }
                        @if !post.published {
                            " \u{b7} " mark { "Draft" }
                        }
                    }
                }
            }
            @if let Some(cover) = post.cover_image() {
                figure {
                    img class="cover" src=(format!("/static/uploads/{cover}")) alt=(post.title);
                }
            }
            (paragraphs(&post.content))
            @if ctx.viewer.is_admin {
                footer {
                    (Button::outline("Edit").href(&edit_href))
                }
            }
        }
        p { a href="/" { "\u{2190} All posts" } }
    };

    ctx.layout(&post.title).render(content)
}

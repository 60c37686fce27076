//! Admin pages: post dashboard, post editor and feedback inbox.

use maud::{html, Markup};

use super::{display_date, excerpt, PageContext};
use crate::components::{
    Alert, Button, Checkbox, Form, FormGroup, Input, Pagination, Table, TextArea,
};
use crate::db::{Feedback, FeedbackPage};
use crate::posts::Post;
use crate::uploads::ALLOWED_EXTENSIONS;

/// All posts, newest first, with edit and delete actions.
#[must_use]
pub fn render_dashboard(ctx: &PageContext<'_>, posts: &[Post]) -> Markup {
    let rows = posts.iter().map(dashboard_row).collect();

    let content = html! {
        hgroup {
            h1 { "Posts" }
            p { (posts.len()) " total" }
        }
        p { (Button::primary("New post").href("/admin/new")) }
        @if posts.is_empty() {
            (Alert::info("No posts yet."))
        } @else {
            (Table::new(vec!["Title", "Status", "Created", "Actions"])
                .class("admin-table")
                .rows(rows))
        }
    };

    ctx.layout("Admin").render(content)
}

fn dashboard_row(post: &Post) -> Markup {
    let view_href = format!("/post/{}", post.slug);
    let edit_href = format!("/admin/edit/{}", post.id);
    let delete_action = format!("/admin/delete/{}", post.id);

    html! {
        tr {
            td { a href=(view_href) { (post.title) } }
            td {
                @if post.published { "Published" } @else { mark { "Draft" } }
            }
            td { (display_date(&post.created_at)) }
            td class="actions" {
                (Button::small("Edit").href(&edit_href))
                (Form::post(&delete_action, html! {
                    (Button::danger("Delete").confirm("Delete this post?"))
                }).class("inline"))
            }
        }
    }
}

/// Whether the editor creates a post or edits an existing one.
#[derive(Debug, Clone, Copy)]
pub enum PostFormMode<'a> {
    New,
    Edit(&'a Post),
}

/// Post editor. The form posts back to its own URL.
#[must_use]
pub fn render_post_form(ctx: &PageContext<'_>, mode: PostFormMode<'_>) -> Markup {
    let (heading, action, post) = match mode {
        PostFormMode::New => ("New post", "/admin/new".to_string(), None),
        PostFormMode::Edit(post) => ("Edit post", format!("/admin/edit/{}", post.id), Some(post)),
    };
    let accept = ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");

    let content = html! {
        h1 { (heading) }
        (Form::post(&action, html! {
            (FormGroup::new("Title", "title",
                Input::text("title").value(post.map_or("", |p| p.title.as_str())).required()))
            (FormGroup::new("Content", "content",
                TextArea::new("content").value(post.map_or("", |p| p.content.as_str())).rows(14).required()))
            @if let Some(cover) = post.and_then(Post::cover_image) {
                figure {
                    img class="cover-preview" src=(format!("/static/uploads/{cover}")) alt="Current cover";
                    figcaption { "Current cover. Upload a new image to replace it." }
                }
            }
            (FormGroup::new("Cover image", "cover", Input::file("cover", &accept)))
            (Checkbox::new("published", "Published", post.map_or(true, |p| p.published)))
            (Button::primary("Save"))
        }).multipart())
    };

    ctx.layout(heading).render(content)
}

/// One page of visitor feedback.
#[must_use]
pub fn render_feedbacks(ctx: &PageContext<'_>, page: &FeedbackPage) -> Markup {
    let last_page = usize::try_from(page.last_page()).unwrap_or(0);
    let current = usize::try_from(page.page).unwrap_or(1);
    let rows = page.items.iter().map(feedback_row).collect();

    let content = html! {
        hgroup {
            h1 { "Feedback" }
            p { (page.total) " total" }
        }
        @if page.items.is_empty() {
            (Alert::info("No feedback on this page."))
        } @else {
            (Table::new(vec!["Received", "From", "Rating", "Message", ""])
                .class("admin-table")
                .rows(rows))
        }
        (Pagination::new(current, last_page, "/admin/feedbacks"))
    };

    ctx.layout("Feedback").render(content)
}

fn feedback_row(feedback: &Feedback) -> Markup {
    let delete_action = format!("/admin/feedbacks/delete/{}", feedback.id);
    // Stored as "YYYY-MM-DDTHH:MM:SS.sssZ"; show date and minutes.
    let received = feedback
        .created_at
        .get(..16)
        .map_or(feedback.created_at.clone(), |s| s.replace('T', " "));

    html! {
        tr {
            td { (received) }
            td {
                (feedback.name)
                @if let Some(email) = &feedback.email {
                    br;
                    small { a href=(format!("mailto:{email}")) { (email) } }
                }
            }
            td {
                @match feedback.rating {
                    Some(rating) => { (rating) " / 5" }
                    None => { "\u{2014}" }
                }
            }
            td title=(feedback.message) { (excerpt(&feedback.message, 160)) }
            td {
                (Form::post(&delete_action, html! {
                    (Button::danger("Delete").confirm("Delete this feedback?"))
                }).class("inline"))
            }
        }
    }
}

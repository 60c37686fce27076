//! Admin routes. Every handler takes [`RequireAdmin`], so anonymous callers are
//! redirected to `/login` before any work happens.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use super::flash::{self, Flash, Flashes};
use super::pages::{self, PostFormMode};
use super::routes::parse_page;
use super::{page_context, AppError, AppState};
use crate::auth::{RequireAdmin, Viewer};
use crate::db;
use crate::feedback::FEEDBACKS_PER_PAGE;
use crate::posts::{visible_posts, PostDraft};
use crate::uploads::{save_image, ImageUpload, UploadedFile, REJECTED_MESSAGE};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard))
        .route("/admin/new", get(new_post_form).post(create_post))
        .route("/admin/edit/:id", get(edit_post_form).post(update_post))
        .route("/admin/delete/:id", post(delete_post))
        .route("/admin/feedbacks", get(feedbacks))
        .route("/admin/feedbacks/delete/:id", post(delete_feedback))
}

/// Fields of the multipart post editor.
#[derive(Debug, Default)]
struct PostSubmission {
    title: String,
    content: String,
    published: bool,
    cover: Option<UploadedFile>,
}

impl PostSubmission {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => submission.title = field.text().await?,
                "content" => submission.content = field.text().await?,
                "published" => submission.published = field.text().await? == "on",
                "cover" => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await?.to_vec();
                    submission.cover = Some(UploadedFile { filename, bytes });
                }
                other => debug!(field = other, "Ignoring unknown form field"),
            }
        }

        Ok(submission)
    }

    fn draft(&self) -> PostDraft {
        PostDraft::from_form(&self.title, &self.content, self.published)
    }
}

/// GET /admin - All posts, newest first.
async fn dashboard(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    flashes: Flashes,
) -> Result<Response, AppError> {
    let posts = state.posts.load().await?;
    let posts = visible_posts(&posts, true, None);

    let ctx = page_context(&state, Viewer { is_admin: true }, &flashes);
    Ok(flashes.page(pages::render_dashboard(&ctx, &posts)))
}

/// GET /admin/new
async fn new_post_form(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    flashes: Flashes,
) -> Response {
    let ctx = page_context(&state, Viewer { is_admin: true }, &flashes);
    flashes.page(pages::render_post_form(&ctx, PostFormMode::New))
}

/// POST /admin/new
async fn create_post(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let secure = state.config.secure_cookies;
    let submission = PostSubmission::read(multipart).await?;

    let draft = submission.draft();
    if !draft.is_valid() {
        return Ok(
            Flash::warning("Title and content are required (content \u{2265} 10 chars).")
                .redirect("/admin/new", secure),
        );
    }

    let upload = save_image(&state.config.upload_dir(), submission.cover.as_ref()).await?;
    let mut notices = Vec::new();
    if upload == ImageUpload::Rejected {
        notices.push(Flash::warning(REJECTED_MESSAGE));
    }

    let cover = upload.into_filename();
    let created = state
        .posts
        .modify(|posts| Some(posts.insert(draft, cover, Utc::now())))
        .await?;
    if let Some(post) = created {
        info!(post_id = post.id, slug = %post.slug, published = post.published, "Post created");
    }

    notices.push(Flash::success("Post created."));
    Ok(flash::redirect_with(&notices, "/admin", secure))
}

/// GET /admin/edit/:id
async fn edit_post_form(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    flashes: Flashes,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let posts = state.posts.load().await?;
    let post = posts.find_by_id(id).ok_or(AppError::NotFound("Post not found."))?;

    let ctx = page_context(&state, Viewer { is_admin: true }, &flashes);
    Ok(flashes.page(pages::render_post_form(&ctx, PostFormMode::Edit(post))))
}

/// POST /admin/edit/:id
async fn update_post(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let secure = state.config.secure_cookies;

    if state.posts.load().await?.find_by_id(id).is_none() {
        return Err(AppError::NotFound("Post not found."));
    }

    let submission = PostSubmission::read(multipart).await?;
    let draft = submission.draft();
    if !draft.is_valid() {
        return Ok(Flash::warning("Title and content are required.")
            .redirect(&format!("/admin/edit/{id}"), secure));
    }

    let upload = save_image(&state.config.upload_dir(), submission.cover.as_ref()).await?;
    let mut notices = Vec::new();
    if upload == ImageUpload::Rejected {
        notices.push(Flash::warning(REJECTED_MESSAGE));
    }

    let cover = upload.into_filename();
    let updated = state
        .posts
        .modify(|posts| posts.update(id, draft, cover))
        .await?
        .ok_or(AppError::NotFound("Post not found."))?;
    info!(post_id = updated.id, slug = %updated.slug, published = updated.published, "Post updated");

    notices.push(Flash::success("Post updated."));
    Ok(flash::redirect_with(&notices, "/admin", secure))
}

/// POST /admin/delete/:id
async fn delete_post(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let removed = state
        .posts
        .modify(|posts| posts.remove(id))
        .await?
        .ok_or(AppError::NotFound("Post not found."))?;
    info!(post_id = removed.id, slug = %removed.slug, "Post deleted");

    Ok(Flash::info("Post deleted.").redirect("/admin", state.config.secure_cookies))
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackListParams {
    page: Option<String>,
}

/// GET /admin/feedbacks - Paginated feedback inbox.
async fn feedbacks(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    flashes: Flashes,
    Query(params): Query<FeedbackListParams>,
) -> Result<Response, AppError> {
    let page = i64::try_from(parse_page(params.page.as_deref())).unwrap_or(1);
    let page = db::list_feedbacks_page(state.db.pool(), page, FEEDBACKS_PER_PAGE).await?;

    let ctx = page_context(&state, Viewer { is_admin: true }, &flashes);
    Ok(flashes.page(pages::render_feedbacks(&ctx, &page)))
}

/// POST /admin/feedbacks/delete/:id
async fn delete_feedback(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let removed = db::delete_feedback(state.db.pool(), id).await?;
    let notice = if removed > 0 {
        info!(feedback_id = id, "Feedback deleted");
        Flash::info("Feedback deleted.")
    } else {
        debug!(feedback_id = id, "Feedback already gone");
        Flash::info("Feedback not found; nothing deleted.")
    };

    Ok(notice.redirect("/admin/feedbacks", state.config.secure_cookies))
}

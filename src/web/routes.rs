use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;
use tracing::{debug, info};

use super::flash::{Flash, Flashes};
use super::{page_context, pages, AppError, AppState};
use crate::auth::Viewer;
use crate::db;
use crate::feedback::validate_submission;
use crate::posts::{paginate, visible_posts, POSTS_PER_PAGE};

/// Create the router with all public routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/post/:slug", get(view_post))
        .route("/feedback", get(feedback_form).post(submit_feedback))
        .route("/healthz", get(health))
}

/// Parse a 1-indexed `page` query value; anything unusable means page 1.
pub(super) fn parse_page(raw: Option<&str>) -> usize {
    raw.and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    q: Option<String>,
    page: Option<String>,
}

async fn home(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
    Query(params): Query<ListingParams>,
) -> Result<Response, AppError> {
    let posts = state.posts.load().await?;
    let query = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let visible = visible_posts(&posts, viewer.is_admin, query);
    let page = paginate(visible, parse_page(params.page.as_deref()), POSTS_PER_PAGE);
    debug!(
        query = ?query,
        page = page.page,
        total = page.total,
        "Rendering post listing"
    );

    let ctx = page_context(&state, viewer, &flashes);
    Ok(flashes.page(pages::render_home(&ctx, &page, query)))
}

async fn view_post(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let posts = state.posts.load().await?;
    let post = posts
        .find_by_slug(&slug)
        .filter(|p| p.published || viewer.is_admin)
        .ok_or(AppError::NotFound("Post not found."))?;

    let ctx = page_context(&state, viewer, &flashes);
    Ok(flashes.page(pages::render_post(&ctx, post)))
}

async fn feedback_form(
    State(state): State<AppState>,
    viewer: Viewer,
    flashes: Flashes,
) -> Response {
    let ctx = page_context(&state, viewer, &flashes);
    flashes.page(pages::render_feedback_form(&ctx))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedbackForm {
    name: String,
    email: String,
    rating: String,
    message: String,
}

async fn submit_feedback(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> Result<Response, AppError> {
    let secure = state.config.secure_cookies;

    let feedback = match validate_submission(&form.name, &form.email, &form.rating, &form.message)
    {
        Ok(feedback) => feedback,
        Err(e) => {
            debug!(reason = %e, "Rejected feedback submission");
            return Ok(Flash::warning(e.to_string()).redirect("/feedback", secure));
        }
    };

    let id = db::insert_feedback(state.db.pool(), &feedback).await?;
    info!(feedback_id = id, rating = ?feedback.rating, "Feedback received");

    Ok(Flash::success("Thanks for your feedback!").redirect("/", secure))
}

async fn health() -> impl IntoResponse {
    "OK"
}

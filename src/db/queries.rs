use anyhow::{Context, Result};
use sqlx::SqlitePool;

use super::models::{Feedback, FeedbackPage, NewFeedback, Session};

// ========== Feedback ==========

/// Insert a feedback row, returning its ID.
pub async fn insert_feedback(pool: &SqlitePool, feedback: &NewFeedback) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO feedbacks (name, email, rating, message)
        VALUES (?, ?, ?, ?)
        ",
    )
    .bind(&feedback.name)
    .bind(&feedback.email)
    .bind(feedback.rating.map(i64::from))
    .bind(&feedback.message)
    .execute(pool)
    .await
    .context("Failed to insert feedback")?;

    Ok(result.last_insert_rowid())
}

/// Count all feedback rows.
pub async fn count_feedbacks(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM feedbacks")
        .fetch_one(pool)
        .await
        .context("Failed to count feedbacks")
}

/// Get a feedback row by ID.
pub async fn get_feedback(pool: &SqlitePool, id: i64) -> Result<Option<Feedback>> {
    sqlx::query_as("SELECT * FROM feedbacks WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch feedback")
}

/// Get one page of feedback, newest first.
///
/// `page` is 1-indexed; values below 1 are treated as 1. The count and the
/// page are read by separate statements, so concurrent inserts can make them
/// disagree.
pub async fn list_feedbacks_page(
    pool: &SqlitePool,
    page: i64,
    per_page: i64,
) -> Result<FeedbackPage> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let offset = (page - 1).saturating_mul(per_page);

    let total = count_feedbacks(pool).await?;

    let items = sqlx::query_as(
        r"
        SELECT id, name, email, rating, message, created_at
        FROM feedbacks
        ORDER BY created_at DESC, id DESC
        LIMIT ? OFFSET ?
        ",
    )
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to fetch feedback page")?;

    Ok(FeedbackPage {
        items,
        total,
        page,
        per_page,
    })
}

/// Delete a feedback row, returning the number of rows removed (0 if it did not exist).
pub async fn delete_feedback(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM feedbacks WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete feedback")?;

    Ok(result.rows_affected())
}

// ========== Sessions ==========

/// Create a session, returning its ID.
pub async fn create_session(
    pool: &SqlitePool,
    token_hash: &str,
    is_admin: bool,
    expires_at: &str,
) -> Result<i64> {
    let result = sqlx::query(
        r"
        INSERT INTO sessions (token_hash, is_admin, expires_at)
        VALUES (?, ?, ?)
        ",
    )
    .bind(token_hash)
    .bind(is_admin)
    .bind(expires_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(result.last_insert_rowid())
}

/// Get a session by its token hash.
pub async fn get_session_by_token_hash(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<Session>> {
    sqlx::query_as("SELECT * FROM sessions WHERE token_hash = ?")
        .bind(token_hash)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch session")
}

/// Update session `last_used_at` timestamp.
pub async fn update_session_last_used(pool: &SqlitePool, session_id: i64) -> Result<()> {
    sqlx::query(
        "UPDATE sessions SET last_used_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
    )
    .bind(session_id)
    .execute(pool)
    .await
    .context("Failed to update session last_used_at")?;

    Ok(())
}

/// Delete a session by its token hash.
pub async fn delete_session(pool: &SqlitePool, token_hash: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(token_hash)
        .execute(pool)
        .await
        .context("Failed to delete session")?;

    Ok(result.rows_affected())
}

/// Delete sessions whose expiry has passed.
pub async fn delete_expired_sessions(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query(
        "DELETE FROM sessions WHERE expires_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
    )
    .execute(pool)
    .await
    .context("Failed to delete expired sessions")?;

    Ok(result.rows_affected())
}

use serde::{Deserialize, Serialize};

/// A visitor-submitted feedback row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub rating: Option<i64>,
    pub message: String,
    pub created_at: String,
}

/// Values for inserting a feedback row. `id` and `created_at` are store-assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub name: String,
    pub email: Option<String>,
    pub rating: Option<u8>,
    pub message: String,
}

/// A page of feedback rows plus the total row count at query time.
#[derive(Debug, Clone)]
pub struct FeedbackPage {
    pub items: Vec<Feedback>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl FeedbackPage {
    /// `ceil(total / per_page)`; 0 when the table is empty.
    #[must_use]
    pub fn last_page(&self) -> i64 {
        if self.per_page <= 0 {
            return 0;
        }
        (self.total + self.per_page - 1) / self.per_page
    }
}

/// A server-side login session.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: i64,
    pub token_hash: String,
    pub is_admin: bool,
    pub created_at: String,
    pub last_used_at: String,
    pub expires_at: String,
}

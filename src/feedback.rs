//! Validation of visitor feedback submissions.

use thiserror::Error;

use crate::db::NewFeedback;

pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_EMAIL_CHARS: usize = 120;
pub const MIN_MESSAGE_CHARS: usize = 3;

/// Feedback admin list page size.
pub const FEEDBACKS_PER_PAGE: i64 = 12;

/// Why a submission was refused. The display text is shown to the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("Please provide your name and a valid message.")]
    MissingFields,
    #[error("Name must be at most {MAX_NAME_CHARS} characters.")]
    NameTooLong,
    #[error("Email must be at most {MAX_EMAIL_CHARS} characters.")]
    EmailTooLong,
}

/// Parse a 1-5 star rating. Anything else, including blanks, is no rating.
#[must_use]
pub fn parse_rating(raw: &str) -> Option<u8> {
    raw.trim()
        .parse::<u8>()
        .ok()
        .filter(|rating| (1..=5).contains(rating))
}

/// Check raw form values and build the row to insert.
///
/// All fields are trimmed. A blank email becomes `None`; a bad rating is
/// dropped rather than failing the submission.
///
/// # Errors
///
/// Returns an error if the name or message is missing, the message is too
/// short, or a field is over its length limit.
pub fn validate_submission(
    name: &str,
    email: &str,
    rating: &str,
    message: &str,
) -> Result<NewFeedback, FeedbackError> {
    let name = name.trim();
    let email = email.trim();
    let message = message.trim();

    if name.is_empty() || message.chars().count() < MIN_MESSAGE_CHARS {
        return Err(FeedbackError::MissingFields);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(FeedbackError::NameTooLong);
    }
    if email.chars().count() > MAX_EMAIL_CHARS {
        return Err(FeedbackError::EmailTooLong);
    }

    Ok(NewFeedback {
        name: name.to_string(),
        email: Some(email.to_string()).filter(|e| !e.is_empty()),
        rating: parse_rating(rating),
        message: message.to_string(),
    })
}

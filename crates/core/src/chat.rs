//! Pure chat domain helpers: unordered-pair canonicalization, counterpart
//! resolution, and message text normalization.
//!
//! A chat session is the unique conversation between exactly two users. The
//! schema stores the pair as ordered columns `(user1_id, user2_id)` with a
//! uniqueness constraint on that ordering only, so lookups check both
//! orderings while inserts go through [`ordered_pair`] to keep new rows
//! canonical.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum accepted message length in characters, post-trim.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Canonicalize an unordered user pair as `(lower, higher)`.
pub fn ordered_pair(a: DbId, b: DbId) -> (DbId, DbId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Resolve the other participant of a session pair.
///
/// Returns `None` if `user_id` is not one of the two participants.
pub fn counterpart_of(user1_id: DbId, user2_id: DbId, user_id: DbId) -> Option<DbId> {
    if user_id == user1_id {
        Some(user2_id)
    } else if user_id == user2_id {
        Some(user1_id)
    } else {
        None
    }
}

/// Trim and validate message text.
///
/// Rejects text that is empty after trimming, or longer than
/// [`MAX_MESSAGE_LEN`] characters. Returns the trimmed text on success.
pub fn normalize_message_text(text: &str) -> Result<String, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Message text must not be empty".into(),
        ));
    }
    if trimmed.chars().count() > MAX_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Message text must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

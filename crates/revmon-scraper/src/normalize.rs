//! Normalization from [`RawReview`] to [`revmon_core::Review`].

use chrono::{DateTime, Utc};
use revmon_core::Review;

use crate::error::ScraperError;
use crate::types::RawReview;

/// Converts a raw review, resolving its relative date against `anchor`.
///
/// Provenance fields are left empty; the monitor attaches them.
///
/// # Errors
///
/// Returns [`ScraperError::Timestamp`] if the relative date cannot be
/// resolved. No fallback timestamp is substituted.
pub fn normalize_review(raw: RawReview, anchor: DateTime<Utc>) -> Result<Review, ScraperError> {
    let timestamp = revmon_core::resolve(&raw.relative_date, anchor).map_err(|source| {
        ScraperError::Timestamp {
            review_id: raw.id_review.clone(),
            relative_date: raw.relative_date.clone(),
            source,
        }
    })?;

    Ok(Review {
        id: raw.id_review,
        timestamp,
        text: raw.caption,
        author: raw.username,
        rating: raw.rating,
        target_name: String::new(),
        target_address: String::new(),
    })
}

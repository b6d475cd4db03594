//! Wire types for the external scraper service.
//!
//! The service renders the listing page, applies the "newest first" sort
//! and extracts reviews; this crate only speaks its JSON API:
//!
//! - `POST /sort` with `{"url": ...}` answers `{"status": 0}` when the
//!   page was re-sorted newest-first. Any other status means the sort did
//!   not take effect and the page must not be paginated.
//! - `GET /reviews?url=...&offset=N` answers `{"reviews": [...]}` with the
//!   batch starting at `offset`. An empty array means the feed is exhausted.
//!
//! Review dates come back exactly as the page shows them ("3 weeks ago");
//! turning them into timestamps happens in [`crate::normalize`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct SortRequest<'a> {
    pub url: &'a str,
}

/// Response from `POST /sort`.
#[derive(Debug, Deserialize)]
pub struct SortResponse {
    pub status: i32,
}

/// Response from `GET /reviews`.
#[derive(Debug, Deserialize)]
pub struct ReviewsPage {
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

/// One review as extracted from the rendered page.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    pub id_review: String,
    pub relative_date: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

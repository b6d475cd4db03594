pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::ScraperServiceClient;
pub use error::ScraperError;
pub use normalize::normalize_review;
pub use types::{RawReview, ReviewsPage, SortResponse};

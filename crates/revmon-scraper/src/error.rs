use revmon_core::RelativeTimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid scraper service URL \"{url}\": {reason}")]
    InvalidServiceUrl { url: String, reason: String },

    #[error("unparseable date \"{relative_date}\" on review {review_id}: {source}")]
    Timestamp {
        review_id: String,
        relative_date: String,
        #[source]
        source: RelativeTimeError,
    },
}

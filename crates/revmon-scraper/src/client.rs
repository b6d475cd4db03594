//! HTTP client for the external scraper service.

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Url};
use revmon_core::Review;

use crate::error::ScraperError;
use crate::normalize::normalize_review;
use crate::types::{RawReview, ReviewsPage, SortRequest, SortResponse};

/// Client for the scraper service that renders listing pages.
///
/// Every non-2xx response is surfaced as [`ScraperError::UnexpectedStatus`].
/// Nothing is retried here; a failed call fails the target it was made for.
pub struct ScraperServiceClient {
    client: Client,
    base_url: Url,
}

impl ScraperServiceClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScraperError::InvalidServiceUrl`] if
    /// `base_url` is not an absolute URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: Self::normalise_base_url(base_url)?,
        })
    }

    /// Asks the service to re-sort `address` newest-first.
    ///
    /// Returns the service's status code; `0` means the sort took effect.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx HTTP status.
    /// - [`ScraperError::Http`] on network failure.
    /// - [`ScraperError::Deserialize`] if the body is not a sort response.
    pub async fn sort_by_newest(&self, address: &str) -> Result<i32, ScraperError> {
        let url = self.endpoint("sort")?;
        let response = self
            .client
            .post(url.clone())
            .json(&SortRequest { url: address })
            .send()
            .await?;

        let body = Self::success_body(response, &url).await?;
        let parsed = serde_json::from_str::<SortResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("sort response for {address}"),
                source: e,
            }
        })?;

        tracing::debug!(target_address = %address, status = parsed.status, "sort requested");
        Ok(parsed.status)
    }

    /// Fetches the raw batch of reviews for `address` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::sort_by_newest`].
    pub async fn fetch_reviews_page(
        &self,
        address: &str,
        offset: usize,
    ) -> Result<Vec<RawReview>, ScraperError> {
        let url = self.reviews_url(address, offset)?;
        let response = self.client.get(url.clone()).send().await?;

        let body = Self::success_body(response, &url).await?;
        let parsed = serde_json::from_str::<ReviewsPage>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("reviews page at offset {offset} for {address}"),
                source: e,
            }
        })?;

        tracing::debug!(
            target_address = %address,
            offset,
            batch = parsed.reviews.len(),
            "fetched reviews page"
        );
        Ok(parsed.reviews)
    }

    /// Fetches and normalizes one batch, resolving relative dates against
    /// the time the batch was received.
    ///
    /// # Errors
    ///
    /// Anything [`Self::fetch_reviews_page`] returns, plus
    /// [`ScraperError::Timestamp`] when a review's date cannot be resolved.
    pub async fn fetch_reviews(
        &self,
        address: &str,
        offset: usize,
    ) -> Result<Vec<Review>, ScraperError> {
        let raw = self.fetch_reviews_page(address, offset).await?;
        let anchor = Utc::now();
        raw.into_iter()
            .map(|r| normalize_review(r, anchor))
            .collect()
    }

    async fn success_body(response: reqwest::Response, url: &Url) -> Result<String, ScraperError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    fn normalise_base_url(base_url: &str) -> Result<Url, ScraperError> {
        // A single trailing slash makes `Url::join` append instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        Url::parse(&normalised).map_err(|e| ScraperError::InvalidServiceUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ScraperError> {
        self.base_url
            .join(path)
            .map_err(|e| ScraperError::InvalidServiceUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn reviews_url(&self, address: &str, offset: usize) -> Result<Url, ScraperError> {
        let mut url = self.endpoint("reviews")?;
        url.query_pairs_mut()
            .append_pair("url", address)
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

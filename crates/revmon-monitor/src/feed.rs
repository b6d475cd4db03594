use async_trait::async_trait;
use revmon_core::{Review, Target};
use revmon_scraper::{ScraperError, ScraperServiceClient};

/// Newest-first review feed for a target.
///
/// Batches carry no provenance; the monitor attaches it. An empty batch
/// means the feed is exhausted.
#[async_trait]
pub trait PaginatedFeed: Send + Sync {
    /// Re-sorts the target's reviews newest-first. `0` means success; any
    /// other status means the feed must not be paginated.
    async fn sort_by_newest(&self, target: &Target) -> Result<i32, ScraperError>;

    async fn fetch_page(&self, target: &Target, offset: usize)
        -> Result<Vec<Review>, ScraperError>;
}

#[async_trait]
impl PaginatedFeed for ScraperServiceClient {
    async fn sort_by_newest(&self, target: &Target) -> Result<i32, ScraperError> {
        ScraperServiceClient::sort_by_newest(self, &target.address).await
    }

    async fn fetch_page(
        &self,
        target: &Target,
        offset: usize,
    ) -> Result<Vec<Review>, ScraperError> {
        self.fetch_reviews(&target.address, offset).await
    }
}

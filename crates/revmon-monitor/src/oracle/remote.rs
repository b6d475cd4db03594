use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use revmon_core::Review;
use serde::Deserialize;

use super::NoveltyOracle;
use crate::error::OracleError;

#[derive(Debug, Deserialize)]
struct ArbiterVerdict {
    result: bool,
}

/// Remote-arbiter novelty: every candidate is submitted to the ingestion
/// endpoint, which stores it and answers whether monitoring should stop.
///
/// The arbiter owns the date cutoff and deduplication; nothing is checked
/// locally.
pub struct RemoteArbiterOracle {
    client: Client,
    endpoint: Url,
}

impl RemoteArbiterOracle {
    /// # Errors
    ///
    /// Returns [`OracleError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute URL, or [`OracleError::Http`] if the client cannot be built.
    pub fn new(endpoint: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, OracleError> {
        let endpoint = Url::parse(endpoint).map_err(|e| OracleError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl NoveltyOracle for RemoteArbiterOracle {
    async fn is_already_known(&self, review: &Review) -> Result<bool, OracleError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(review)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(OracleError::ArbiterUnavailable {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        let verdict =
            serde_json::from_str::<ArbiterVerdict>(&body).map_err(|e| OracleError::Deserialize {
                context: format!("arbiter verdict for review {}", review.id),
                source: e,
            })?;

        Ok(verdict.result)
    }

    /// The arbiter ingested the review when it was submitted.
    async fn record(&self, _review: &Review) -> Result<(), OracleError> {
        Ok(())
    }
}

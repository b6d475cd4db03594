//! In-memory feed and oracle doubles shared by the monitor tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use revmon_core::{Review, RunSummary, Target};
use revmon_db::DbError;
use revmon_monitor::{NoveltyOracle, OracleError, PaginatedFeed, ReviewStore, SummarySink};
use revmon_scraper::ScraperError;

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// Builds a newest-first run of reviews `prefix-0`, `prefix-1`, ... each one
/// hour older than the previous.
pub fn reviews(prefix: &str, n: usize) -> Vec<Review> {
    (0..n)
        .map(|i| Review {
            id: format!("{prefix}-{i}"),
            timestamp: base_time() - TimeDelta::hours(i64::try_from(i).unwrap()),
            text: Some(format!("review {i}")),
            author: Some("tester".to_string()),
            rating: Some(4.0),
            target_name: String::new(),
            target_address: String::new(),
        })
        .collect()
}

#[derive(Default, Clone)]
pub struct Script {
    pub sort_status: i32,
    pub pages: Vec<Vec<Review>>,
    pub fail_at_offset: Option<usize>,
    pub stall: Option<Duration>,
}

impl Script {
    pub fn pages(pages: Vec<Vec<Review>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }
}

/// Feed that serves fixed pages per target address.
#[derive(Default)]
pub struct ScriptedFeed {
    scripts: HashMap<String, Script>,
    pub sort_calls: Mutex<Vec<String>>,
    pub fetch_calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedFeed {
    pub fn with(mut self, address: &str, script: Script) -> Self {
        self.scripts.insert(address.to_string(), script);
        self
    }

    pub fn fetches_for(&self, address: &str) -> Vec<usize> {
        self.fetch_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(a, _)| a == address)
            .map(|(_, offset)| *offset)
            .collect()
    }

    fn script(&self, target: &Target) -> Script {
        self.scripts.get(&target.address).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl PaginatedFeed for ScriptedFeed {
    async fn sort_by_newest(&self, target: &Target) -> Result<i32, ScraperError> {
        self.sort_calls.lock().unwrap().push(target.address.clone());
        Ok(self.script(target).sort_status)
    }

    async fn fetch_page(
        &self,
        target: &Target,
        offset: usize,
    ) -> Result<Vec<Review>, ScraperError> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push((target.address.clone(), offset));
        let script = self.script(target);

        if let Some(stall) = script.stall {
            tokio::time::sleep(stall).await;
        }
        if script.fail_at_offset == Some(offset) {
            return Err(ScraperError::UnexpectedStatus {
                status: 502,
                url: target.address.clone(),
            });
        }

        let mut start = 0;
        for page in script.pages {
            if start == offset {
                return Ok(page);
            }
            start += page.len();
        }
        Ok(Vec::new())
    }
}

/// Oracle over an in-memory id set, recording every call.
#[derive(Default)]
pub struct MemoryOracle {
    known: Mutex<HashSet<String>>,
    pub checked: Mutex<Vec<Review>>,
    pub recorded: Mutex<Vec<Review>>,
    fail_on: Option<String>,
}

impl MemoryOracle {
    pub fn knowing(ids: &[&str]) -> Self {
        Self {
            known: Mutex::new(ids.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }

    pub fn failing_on(id: &str) -> Self {
        Self {
            fail_on: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn checked_ids(&self) -> Vec<String> {
        self.checked
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }
}

#[async_trait]
impl NoveltyOracle for MemoryOracle {
    async fn is_already_known(&self, review: &Review) -> Result<bool, OracleError> {
        self.checked.lock().unwrap().push(review.clone());
        if self.fail_on.as_deref() == Some(review.id.as_str()) {
            return Err(OracleError::ArbiterUnavailable {
                status: 503,
                url: "http://arbiter.test".to_string(),
            });
        }
        Ok(self.known.lock().unwrap().contains(&review.id))
    }

    async fn record(&self, review: &Review) -> Result<(), OracleError> {
        self.known.lock().unwrap().insert(review.id.clone());
        self.recorded.lock().unwrap().push(review.clone());
        Ok(())
    }
}

/// Sink that keeps every summary it is handed.
#[derive(Default)]
pub struct CollectingSink {
    pub summaries: Mutex<Vec<RunSummary>>,
}

#[async_trait]
impl SummarySink for CollectingSink {
    async fn record(&self, summary: &RunSummary) {
        self.summaries.lock().unwrap().push(summary.clone());
    }
}

/// Review store over an in-memory id set.
#[derive(Default)]
pub struct MemoryStore {
    pub ids: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn stored_count(&self) -> usize {
        self.ids.lock().unwrap().len()
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn contains(&self, review_id: &str) -> Result<bool, DbError> {
        Ok(self.ids.lock().unwrap().contains(review_id))
    }

    async fn insert_if_absent(&self, review: &Review) -> Result<bool, DbError> {
        Ok(self.ids.lock().unwrap().insert(review.id.clone()))
    }
}

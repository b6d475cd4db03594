#[derive(Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub feed_url: String,
    pub arbiter_url: Option<String>,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub call_timeout_secs: u64,
    pub max_pages: usize,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("feed_url", &self.feed_url)
            .field("arbiter_url", &self.arbiter_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("call_timeout_secs", &self.call_timeout_secs)
            .field("max_pages", &self.max_pages)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}

//! Configuration for ingestion and the query service.

use std::time::Duration;

use anyhow::Context;

/// Default settings.
pub mod defaults {
    use std::time::Duration;

    /// Redis URL used when none is configured.
    pub const REDIS_URL: &str = "redis://127.0.0.1:6379";

    /// Maximum in-flight store writes per ingestion pass.
    pub const WRITE_CONCURRENCY: usize = 64;

    /// Maximum in-flight coauthor name lookups per detail query.
    pub const LOOKUP_CONCURRENCY: usize = 16;

    /// Log ingestion progress every this many records.
    pub const PROGRESS_INTERVAL: usize = 1000;

    /// Profile cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cached profiles. The cache is off unless configured.
    pub const CACHE_MAX_SIZE: u64 = 0;

    /// How often a server compares the manifest against its cache.
    pub const CACHE_SYNC_INTERVAL: Duration = Duration::from_secs(10);
}

/// Key namespace in the key-value store.
pub mod keys {
    /// Prefix for author profiles.
    pub const AUTHOR_PREFIX: &str = "author:";

    /// Prefix for coauthor adjacency entries.
    pub const COAUTHORS_PREFIX: &str = "coauthors:";

    /// Prefix for subject entries.
    pub const SUBJECT_PREFIX: &str = "subject:";

    /// List of every subject written by the last ingestion.
    pub const SUBJECT_LIST: &str = "subjects";

    /// Manifest of the last ingestion run.
    pub const MANIFEST: &str = "meta:manifest";

    /// Key for an author profile.
    #[must_use]
    pub fn author(id: u64) -> String {
        format!("{AUTHOR_PREFIX}{id}")
    }

    /// Key for an author's coauthor adjacency.
    #[must_use]
    pub fn coauthors(id: u64) -> String {
        format!("{COAUTHORS_PREFIX}{id}")
    }

    /// Key for a subject entry. The subject is used verbatim.
    #[must_use]
    pub fn subject(name: &str) -> String {
        format!("{SUBJECT_PREFIX}{name}")
    }
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Redis connection URL.
    pub redis_url: String,

    /// Maximum in-flight store writes per ingestion pass (0 = unbounded).
    pub write_concurrency: usize,

    /// Maximum in-flight name lookups per detail query.
    pub lookup_concurrency: usize,

    /// Progress logging interval (0 disables progress logs).
    pub progress_interval: usize,

    /// Profile cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cached profiles (0 disables the cache).
    pub cache_max_size: u64,

    /// Manifest polling interval for cache invalidation.
    pub cache_sync_interval: Duration,
}

impl Config {
    /// Create a configuration for the given Redis URL with default tuning.
    #[must_use]
    pub fn new(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            write_concurrency: defaults::WRITE_CONCURRENCY,
            lookup_concurrency: defaults::LOOKUP_CONCURRENCY,
            progress_interval: defaults::PROGRESS_INTERVAL,
            cache_ttl: defaults::CACHE_TTL,
            cache_max_size: defaults::CACHE_MAX_SIZE,
            cache_sync_interval: defaults::CACHE_SYNC_INTERVAL,
        }
    }

    /// Create a test configuration: no cache, small pools, no progress logs.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            redis_url: defaults::REDIS_URL.to_string(),
            write_concurrency: 4,
            lookup_concurrency: 4,
            progress_interval: 0,
            cache_ttl: Duration::from_secs(0),
            cache_max_size: 0, // No caching in tests
            cache_sync_interval: defaults::CACHE_SYNC_INTERVAL,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a numeric variable does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        let redis_url = std::env::var("AMINER_REDIS_URL")
            .unwrap_or_else(|_| defaults::REDIS_URL.to_string());
        let mut config = Self::new(redis_url);

        if let Some(value) = env_parse("AMINER_WRITE_CONCURRENCY")? {
            config.write_concurrency = value;
        }
        if let Some(value) = env_parse("AMINER_LOOKUP_CONCURRENCY")? {
            config.lookup_concurrency = value;
        }
        if let Some(value) = env_parse("AMINER_PROGRESS_INTERVAL")? {
            config.progress_interval = value;
        }
        if let Some(secs) = env_parse::<u64>("AMINER_CACHE_TTL_SECS")? {
            config.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(value) = env_parse("AMINER_CACHE_MAX_SIZE")? {
            config.cache_max_size = value;
        }
        if let Some(secs) = env_parse::<u64>("AMINER_CACHE_SYNC_SECS")? {
            config.cache_sync_interval = Duration::from_secs(secs.max(1));
        }

        Ok(config)
    }

    /// Check if the profile cache is enabled.
    #[must_use]
    pub const fn cache_enabled(&self) -> bool {
        self.cache_max_size > 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(defaults::REDIS_URL)
    }
}

fn env_parse<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("invalid {name}: {raw}"))?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

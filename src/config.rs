//! Dashboard configuration.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Endpoint, polling and presentation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Base URL of the backend API
    pub api_base_url: String,

    /// Interval between status fetches while a job is running
    pub poll_interval: Duration,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,

    /// Snapshots required before monthly P&L is shown (about one trading month)
    pub min_snapshots_for_monthly: usize,

    /// Rows in the winners/losers tables
    pub composition_preview: usize,

    /// Symbols listed before collapsing to "+N more"
    pub symbol_preview_limit: usize,

    /// Page size when walking paginated list endpoints
    pub page_size: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_secs(2),
            request_timeout: Duration::from_secs(30),
            min_snapshots_for_monthly: 20,
            composition_preview: 5,
            symbol_preview_limit: 8,
            page_size: 50,
        }
    }
}

impl DashboardConfig {
    /// Defaults overridden by environment variables (a `.env` file is honoured):
    /// - ARENA_API_URL
    /// - ARENA_POLL_INTERVAL_MS
    /// - ARENA_REQUEST_TIMEOUT_SECS
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = std::env::var("ARENA_API_URL") {
            config.api_base_url = url;
        }
        if let Ok(ms) = std::env::var("ARENA_POLL_INTERVAL_MS") {
            let ms: u64 = ms.parse().context("Invalid ARENA_POLL_INTERVAL_MS")?;
            config.poll_interval =
                poll_interval_from_millis(ms).context("Invalid ARENA_POLL_INTERVAL_MS")?;
        }
        if let Ok(secs) = std::env::var("ARENA_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().context("Invalid ARENA_REQUEST_TIMEOUT_SECS")?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.api_base_url = config.api_base_url.trim_end_matches('/').to_string();
        Ok(config)
    }
}

/// Poll interval from milliseconds. Tokio intervals need a non-zero period.
pub fn poll_interval_from_millis(ms: u64) -> Result<Duration> {
    if ms == 0 {
        bail!("poll interval must be at least 1ms");
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.min_snapshots_for_monthly, 20);
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        assert!(poll_interval_from_millis(0).is_err());
        assert_eq!(poll_interval_from_millis(500).unwrap(), Duration::from_millis(500));
    }
}

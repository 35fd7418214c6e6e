//! HTTP client for the analytics backend (simulations, Live20, stock data).

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::models::{BenchmarkPoint, Candle, IndicatorPoint, Live20Run, Simulation};

use super::types::*;

/// Client for the analytics backend API.
#[derive(Clone)]
pub struct ArenaClient {
    client: Client,
    base_url: String,
    page_size: u32,
}

impl ArenaClient {
    /// Create a client from dashboard configuration.
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and fail on non-success statuses with the body attached.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to {}", what))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Request to {} failed: {} - {}", what, status, body);
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, what: &str) -> Result<T> {
        debug!(url = %url, "Fetching {}", what);

        self.send(self.client.get(&url), what)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }

    // === Simulations ===

    /// Fetch one page of simulations, newest first.
    pub async fn list_simulations(&self, limit: u32, offset: u32) -> Result<Page<Simulation>> {
        let url = self.url(&format!("/simulations?limit={}&offset={}", limit, offset));
        self.get_json(url, "list simulations").await
    }

    /// Walk every page of the simulation list.
    pub async fn list_all_simulations(&self) -> Result<Vec<Simulation>> {
        let mut simulations = Vec::new();
        let mut offset = 0u32;

        loop {
            let page = self.list_simulations(self.page_size, offset).await?;
            let fetched = page.items.len() as u32;
            simulations.extend(page.items);

            if !page.has_more || fetched == 0 {
                break;
            }
            offset += fetched;
        }

        debug!(count = simulations.len(), "Fetched all simulations");
        Ok(simulations)
    }

    /// Fetch a simulation with its positions and daily snapshots.
    pub async fn get_simulation(&self, id: i64) -> Result<SimulationDetail> {
        let url = self.url(&format!("/simulations/{}", id));
        self.get_json(url, "fetch simulation").await
    }

    pub async fn create_simulation(&self, request: &CreateSimulationRequest) -> Result<Simulation> {
        let url = self.url("/simulations");
        debug!(url = %url, symbols = request.symbols.len(), "Creating simulation");

        self.send(self.client.post(&url).json(request), "create simulation")
            .await?
            .json()
            .await
            .context("Failed to parse create simulation response")
    }

    /// Ask the backend to stop a running simulation.
    pub async fn cancel_simulation(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("/simulations/{}/cancel", id));
        debug!(url = %url, "Cancelling simulation");
        self.send(self.client.post(&url), "cancel simulation").await?;
        Ok(())
    }

    pub async fn delete_simulation(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("/simulations/{}", id));
        debug!(url = %url, "Deleting simulation");
        self.send(self.client.delete(&url), "delete simulation").await?;
        Ok(())
    }

    /// Benchmark series aligned to the simulation's date range.
    pub async fn get_benchmark(&self, id: i64, symbol: BenchmarkSymbol) -> Result<Vec<BenchmarkPoint>> {
        let url = self.url(&format!("/simulations/{}/benchmark?symbol={}", id, symbol));
        self.get_json(url, "fetch benchmark").await
    }

    // === Live20 ===

    pub async fn list_live20_runs(&self, limit: u32, offset: u32) -> Result<Page<Live20Run>> {
        let url = self.url(&format!("/live-20/runs?limit={}&offset={}", limit, offset));
        self.get_json(url, "list Live20 runs").await
    }

    pub async fn get_live20_run(&self, id: i64) -> Result<Live20RunDetail> {
        let url = self.url(&format!("/live-20/runs/{}", id));
        self.get_json(url, "fetch Live20 run").await
    }

    pub async fn cancel_live20_run(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("/live-20/runs/{}/cancel", id));
        debug!(url = %url, "Cancelling Live20 run");
        self.send(self.client.post(&url), "cancel Live20 run").await?;
        Ok(())
    }

    pub async fn delete_live20_run(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("/live-20/runs/{}", id));
        debug!(url = %url, "Deleting Live20 run");
        self.send(self.client.delete(&url), "delete Live20 run").await?;
        Ok(())
    }

    // === Stock data ===

    /// Daily candles for a symbol over a period such as "1mo" or "1y".
    pub async fn get_prices(&self, symbol: &str, period: &str) -> Result<Vec<Candle>> {
        let url = self.url(&format!(
            "/stocks/{}/prices?period={}",
            symbol.to_uppercase(),
            period
        ));
        self.get_json(url, "fetch prices").await
    }

    pub async fn get_indicators(&self, symbol: &str, period: &str) -> Result<Vec<IndicatorPoint>> {
        let url = self.url(&format!(
            "/stocks/{}/indicators?period={}",
            symbol.to_uppercase(),
            period
        ));
        self.get_json(url, "fetch indicators").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_strips_trailing_slash() {
        let config = DashboardConfig {
            api_base_url: "http://example.test/api/v1/".to_string(),
            ..Default::default()
        };
        let client = ArenaClient::new(&config).unwrap();

        assert_eq!(client.url("/simulations/4"), "http://example.test/api/v1/simulations/4");
    }

    #[test]
    fn test_unreachable_backend_is_an_error() {
        let config = DashboardConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let client = ArenaClient::new(&config).unwrap();

        let result = tokio_test::block_on(client.get_simulation(1));
        assert!(result.is_err());
    }
}

//! Token price quotes from the BirdEye public API

use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;

use crate::model::SimError;
use crate::simulation::MarketPrices;

#[derive(Debug, Deserialize)]
struct PriceResponse {
    data: Option<PriceData>,
}

#[derive(Debug, Deserialize)]
struct PriceData {
    value: Option<f64>,
}

/// Extract `data.value` from a price response body
pub fn parse_price_response(body: &str) -> Option<f64> {
    let response: PriceResponse = serde_json::from_str(body).ok()?;
    response
        .data?
        .value
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// HTTP client for `GET {base_url}/defi/price?address=<token>`
pub struct PriceClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PriceClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// USD price of `address`, or `None` on any failure
    pub async fn fetch_price(&self, address: &str) -> Option<f64> {
        let url = format!("{}/defi/price", self.base_url);
        debug!("Fetching price for {}", address);

        let response = match self
            .client
            .get(&url)
            .query(&[("address", address)])
            .header("X-API-KEY", &self.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Price request for {} failed: {}", address, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Price request for {} returned {}", address, status);
            return None;
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("Failed to read price response for {}: {}", address, e);
                return None;
            }
        };

        let price = parse_price_response(&body);
        if price.is_none() {
            warn!("No price in response for {}", address);
        }
        price
    }

    /// Fetch ORE and SOL quotes concurrently
    pub async fn fetch_market_prices(
        &self,
        ore_address: &str,
        sol_address: &str,
    ) -> Result<MarketPrices, SimError> {
        let (ore, sol) = tokio::join!(self.fetch_price(ore_address), self.fetch_price(sol_address));
        MarketPrices::from_quotes(ore, sol)
    }
}

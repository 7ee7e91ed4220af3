//! A [RateProvider] backed by the Frankfurter "latest rates" HTTP API.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::rates::{GatewayError, RateProvider};

/// The public Frankfurter API.
pub const DEFAULT_RATES_API_URL: &str = "https://api.frankfurter.app";

/// How long to wait for the provider before giving up.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The body of `GET /latest`, e.g. `{"amount": 1.0, "base": "USD", "rates": {"EUR": 0.92}}`.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    rates: HashMap<String, Value>,
}

/// Fetches rates from a Frankfurter compatible API.
#[derive(Debug, Clone)]
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    /// Create a provider for the API at `base_url` where every request gives
    /// up after `timeout`.
    ///
    /// # Errors
    /// Returns a [GatewayError::Request] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    async fn latest_rate(&self, from: &str, to: &str) -> Result<f64, GatewayError> {
        let url = format!("{}/latest", self.base_url);
        tracing::debug!("Fetching exchange rate {from} -> {to} from {url}");

        let response: LatestRatesResponse = self
            .client
            .get(&url)
            .query(&[("from", from), ("to", to)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // A well-formed response without the target currency counts as a zero rate.
        match response.rates.get(to) {
            None => Ok(0.0),
            Some(rate) => parse_rate(rate),
        }
    }
}

/// Read a rate given as a JSON number or a numeric string.
fn parse_rate(rate: &Value) -> Result<f64, GatewayError> {
    let parsed = match rate {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| GatewayError::Decode(format!("{rate} is not a valid rate")))
}

//! Looks up the exchange rate between two currencies.

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The currency used when a currency code is missing or blank.
pub const FALLBACK_CURRENCY_CODE: &str = "USD";

/// The rate to multiply an amount in `from` by to get the amount in `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// The multiplier from `from` to `to`.
    pub rate: f64,
    /// The normalized code of the source currency.
    pub from: String,
    /// The normalized code of the target currency.
    pub to: String,
}

/// Why a rate could not be fetched from the provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// The provider did not respond in time.
    #[error("the request to the rate provider timed out")]
    Timeout,

    /// The request could not be sent or the connection failed.
    #[error("the request to the rate provider failed: {0}")]
    Request(String),

    /// The provider responded with a non-success status code.
    #[error("the rate provider responded with status {0}")]
    Status(u16),

    /// The response body was not the expected JSON.
    #[error("could not decode the rate provider response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            GatewayError::Timeout
        } else if let Some(status) = error.status() {
            GatewayError::Status(status.as_u16())
        } else if error.is_decode() {
            GatewayError::Decode(error.to_string())
        } else {
            GatewayError::Request(error.to_string())
        }
    }
}

/// A remote source of the latest exchange rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch the rate from `from` to `to`.
    ///
    /// Both codes are already normalized and differ from each other.
    async fn latest_rate(&self, from: &str, to: &str) -> Result<f64, GatewayError>;
}

/// Normalizes currency codes and asks a [RateProvider] for rates.
///
/// Cheap to clone, all clones share the same provider.
#[derive(Clone)]
pub struct ExchangeRateGateway {
    provider: Arc<dyn RateProvider>,
}

impl Debug for ExchangeRateGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRateGateway").finish_non_exhaustive()
    }
}

impl ExchangeRateGateway {
    /// Create a gateway backed by `provider`.
    pub fn new(provider: impl RateProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Get the rate from `from` to `to`.
    ///
    /// Codes are uppercased and cut to three characters, a missing or blank
    /// code means USD. Equal codes give a rate of 1 without asking the
    /// provider.
    ///
    /// # Errors
    /// Returns the provider's [GatewayError] if the rate could not be fetched.
    pub async fn get_rate(
        &self,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<ExchangeRate, GatewayError> {
        let from = normalize_currency_code(from);
        let to = normalize_currency_code(to);

        let rate = if from == to {
            1.0
        } else {
            self.provider.latest_rate(&from, &to).await?
        };

        Ok(ExchangeRate { rate, from, to })
    }
}

/// Uppercase `code` and keep at most its first three characters.
///
/// A missing or empty code becomes [FALLBACK_CURRENCY_CODE].
pub fn normalize_currency_code(code: Option<&str>) -> String {
    match code {
        Some(code) if !code.is_empty() => code.to_uppercase().chars().take(3).collect(),
        _ => FALLBACK_CURRENCY_CODE.to_owned(),
    }
}

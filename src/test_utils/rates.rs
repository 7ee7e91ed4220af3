use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use crate::rates::{GatewayError, RateProvider};

type CurrencyPair = (String, String);

/// A [RateProvider] with canned answers that records every pair it is asked for.
///
/// Pairs without a canned answer fail with [GatewayError::Request].
#[derive(Debug, Clone, Default)]
pub(crate) struct StubRateProvider {
    rates: HashMap<CurrencyPair, Result<f64, GatewayError>>,
    calls: Arc<Mutex<Vec<CurrencyPair>>>,
}

impl StubRateProvider {
    pub(crate) fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.rates
            .insert((from.to_owned(), to.to_owned()), Ok(rate));
        self
    }

    pub(crate) fn with_failure(mut self, from: &str, to: &str) -> Self {
        self.rates.insert(
            (from.to_owned(), to.to_owned()),
            Err(GatewayError::Request("connection refused".to_owned())),
        );
        self
    }

    pub(crate) fn calls(&self) -> Vec<CurrencyPair> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateProvider for StubRateProvider {
    async fn latest_rate(&self, from: &str, to: &str) -> Result<f64, GatewayError> {
        let pair = (from.to_owned(), to.to_owned());
        self.calls.lock().unwrap().push(pair.clone());

        self.rates
            .get(&pair)
            .cloned()
            .unwrap_or_else(|| Err(GatewayError::Request(format!("no stub rate for {from}/{to}"))))
    }
}

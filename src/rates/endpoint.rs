//! The endpoint for looking up a single exchange rate.

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    rates::{ExchangeRate, ExchangeRateGateway},
};

const DEFAULT_FROM: &str = "USD";
const DEFAULT_TO: &str = "EUR";

/// The state needed to look up exchange rates.
#[derive(Debug, Clone)]
pub struct RatesState {
    /// The lookup for exchange rates between currencies.
    pub rate_gateway: ExchangeRateGateway,
}

impl FromRef<AppState> for RatesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            rate_gateway: state.rate_gateway.clone(),
        }
    }
}

/// The currencies to convert between, USD to EUR when omitted.
#[derive(Debug, Default, Deserialize)]
pub struct RatesQuery {
    from: Option<String>,
    to: Option<String>,
}

/// A route handler that responds with the latest rate between two currencies.
///
/// Responds with 502 Bad Gateway if the rate provider fails.
pub async fn get_rate_endpoint(
    State(state): State<RatesState>,
    Query(query): Query<RatesQuery>,
) -> Result<Json<ExchangeRate>, Error> {
    let from = query.from.as_deref().unwrap_or(DEFAULT_FROM);
    let to = query.to.as_deref().unwrap_or(DEFAULT_TO);

    state
        .rate_gateway
        .get_rate(Some(from), Some(to))
        .await
        .map(Json)
        .map_err(Error::RateUnavailable)
}

//! The dashboard summary endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    db::lock_connection,
    rates::ExchangeRateGateway,
    summary::{
        conversion::{collect_rates, convert_summary},
        report::{build_summary, get_currency_breakdowns},
    },
};

/// The state needed to summarise expenses.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The lookup for converting totals into the display currency.
    pub rate_gateway: ExchangeRateGateway,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            rate_gateway: state.rate_gateway.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    to_currency: Option<String>,
}

impl SummaryQuery {
    /// The requested display currency: trimmed, uppercased and at most three
    /// characters, or `None` if it is blank.
    fn display_currency(&self) -> Option<String> {
        let code: String = self
            .to_currency
            .as_deref()?
            .trim()
            .to_uppercase()
            .chars()
            .take(3)
            .collect();

        (!code.is_empty()).then_some(code)
    }
}

/// A route handler that responds with the dashboard totals.
///
/// With `to_currency`, totals are converted into that currency. Currencies
/// whose rate cannot be fetched are counted at a rate of 1.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Response, Error> {
    let Some(display_currency) = query.display_currency() else {
        let connection = lock_connection(&state.db_connection)?;
        let summary = build_summary(&connection)?;

        return Ok(Json(summary).into_response());
    };

    let breakdowns = {
        let connection = lock_connection(&state.db_connection)?;
        get_currency_breakdowns(&connection)?
    };

    let rates = collect_rates(
        &breakdowns.currencies(),
        &display_currency,
        &state.rate_gateway,
    )
    .await;

    Ok(Json(convert_summary(&breakdowns, &rates, &display_currency)).into_response())
}

//! An expense tracker for personal finances.
//!
//! This library provides a JSON REST API for recording expenses, summarising
//! them for a dashboard, and converting the totals into a single display
//! currency using live exchange rates.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod expense;
mod rates;
mod routing;
mod summary;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use rates::{
    DEFAULT_RATES_API_URL, DEFAULT_REQUEST_TIMEOUT, ExchangeRate, ExchangeRateGateway,
    FrankfurterProvider, GatewayError, RateProvider,
};
pub use routing::{add_tracing_layer, build_router, cors_layer};
pub use validation::ValidationErrors;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body failed validation.
    ///
    /// The client should fix the fields named in the error and try again.
    #[error("invalid input: {0}")]
    Validation(ValidationErrors),

    /// The request body could not be read as a JSON object.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// The exchange rate provider could not supply a rate.
    #[error("could not fetch exchange rate: {0}")]
    RateUnavailable(GatewayError),

    /// A timestamp could not be formatted as ISO-8601.
    #[error("could not format timestamp: {0}")]
    TimestampFormat(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Error::InvalidJson(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
            }
            Error::NotFound | Error::UpdateMissingExpense | Error::DeleteMissingExpense => (
                StatusCode::NOT_FOUND,
                Json(json!({ "detail": "Not found." })),
            )
                .into_response(),
            Error::RateUnavailable(reason) => {
                tracing::warn!("Could not fetch exchange rate: {reason}");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "Could not fetch exchange rate" })),
                )
                    .into_response()
            }
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{
        body::to_bytes,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde_json::{Value, json};

    use crate::{Error, GatewayError, ValidationErrors};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("could not read response body");

        serde_json::from_slice(&bytes).expect("response body is not JSON")
    }

    #[tokio::test]
    async fn validation_error_is_bad_request_with_field_messages() {
        let response =
            Error::Validation(ValidationErrors::single("amount", "bad")).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "amount": ["bad"] }));
    }

    #[tokio::test]
    async fn missing_expenses_are_not_found() {
        for error in [
            Error::NotFound,
            Error::UpdateMissingExpense,
            Error::DeleteMissingExpense,
        ] {
            let response = error.into_response();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(body_json(response).await, json!({ "detail": "Not found." }));
        }
    }

    #[tokio::test]
    async fn unavailable_rate_is_bad_gateway() {
        let response = Error::RateUnavailable(GatewayError::Timeout).into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Could not fetch exchange rate" })
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "detail": "Internal server error." })
        );
    }
}

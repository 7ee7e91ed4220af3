//! Exchange rates between currencies.
//!
//! This module contains:
//! - The [ExchangeRateGateway] that normalizes currency codes and fetches rates
//! - The [RateProvider] trait and its HTTP implementation, [FrankfurterProvider]
//! - The route handler for looking up a rate

mod endpoint;
mod frankfurter;
mod gateway;

pub use endpoint::{RatesState, get_rate_endpoint};
pub use frankfurter::{DEFAULT_RATES_API_URL, DEFAULT_REQUEST_TIMEOUT, FrankfurterProvider};
pub use gateway::{ExchangeRate, ExchangeRateGateway, GatewayError, RateProvider};

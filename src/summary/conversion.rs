//! Converting per-currency totals into a single display currency.

use std::collections::{BTreeMap, HashMap};

use futures::future::join_all;

use crate::{
    expense::Currency,
    rates::ExchangeRateGateway,
    summary::report::{CategoryTotal, ConvertedSummary, CurrencyBreakdowns, MonthTotal, Totals},
};

/// The rate used for a currency whose rate could not be fetched.
const FALLBACK_RATE: f64 = 1.0;

/// Get the rate from each of `currencies` to `display_currency`.
///
/// A currency equal to the display currency gets a rate of 1 without asking
/// the gateway. The remaining lookups run concurrently and any that fail fall
/// back to a rate of 1.
pub async fn collect_rates(
    currencies: &[Currency],
    display_currency: &str,
    gateway: &ExchangeRateGateway,
) -> HashMap<Currency, f64> {
    let lookups = currencies.iter().map(|&currency| async move {
        if currency.as_str() == display_currency {
            return (currency, 1.0);
        }

        match gateway
            .get_rate(Some(currency.as_str()), Some(display_currency))
            .await
        {
            Ok(exchange_rate) => (currency, exchange_rate.rate),
            Err(error) => {
                tracing::warn!(
                    "Could not fetch rate {currency} -> {display_currency}, using {FALLBACK_RATE}: {error}"
                );
                (currency, FALLBACK_RATE)
            }
        }
    });

    join_all(lookups).await.into_iter().collect()
}

/// Multiply each per-currency total by its rate and add them up per category
/// and per month.
pub fn convert_summary(
    breakdowns: &CurrencyBreakdowns,
    rates: &HashMap<Currency, f64>,
    display_currency: &str,
) -> ConvertedSummary {
    let rate_for = |currency: &Currency| rates.get(currency).copied().unwrap_or(FALLBACK_RATE);

    let mut by_category: Vec<CategoryTotal> = Vec::new();
    for row in &breakdowns.by_category_currency {
        let converted = row.total * rate_for(&row.currency);

        match by_category
            .iter_mut()
            .find(|total| total.category == row.category)
        {
            Some(total) => {
                total.total += converted;
                total.count += row.count;
            }
            None => by_category.push(CategoryTotal {
                category: row.category,
                total: converted,
                count: row.count,
            }),
        }
    }
    by_category.sort_by(|a, b| b.total.total_cmp(&a.total));

    let mut by_month: BTreeMap<&str, MonthTotal> = BTreeMap::new();
    for row in &breakdowns.by_month_currency {
        let converted = row.total * rate_for(&row.currency);
        let total = by_month
            .entry(row.month.as_str())
            .or_insert_with(|| MonthTotal {
                month: row.month.clone(),
                total: 0.0,
                count: 0,
            });
        total.total += converted;
        total.count += row.count;
    }

    let total: f64 = by_category.iter().map(|row| row.total).sum();
    let count: i64 = by_category.iter().map(|row| row.count).sum();
    let average = if count == 0 { 0.0 } else { total / count as f64 };

    ConvertedSummary {
        by_category,
        by_month: by_month.into_values().collect(),
        totals: Totals {
            total,
            count,
            average,
        },
        display_currency: display_currency.to_owned(),
    }
}

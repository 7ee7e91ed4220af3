//! Dashboard totals over every expense, in the currencies they were paid in.

use std::cmp::Reverse;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    expense::{Category, Currency, Dimension, ExpenseAggregate, aggregate_expenses},
};

/// The total and number of expenses in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub count: i64,
}

/// The total and number of expenses in one month, e.g. `2024-01-01`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: String,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTotal {
    pub currency: Currency,
    pub total: f64,
    pub count: i64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCurrencyTotal {
    pub category: Category,
    pub currency: Currency,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCurrencyTotal {
    pub month: String,
    pub currency: Currency,
    pub total: f64,
    pub count: i64,
}

/// Grand totals over every expense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total: f64,
    pub count: i64,
    pub average: f64,
}

/// Totals where amounts in different currencies are added together as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Descending total.
    pub by_category: Vec<CategoryTotal>,
    /// Ascending month.
    pub by_month: Vec<MonthTotal>,
    /// Descending total.
    pub by_currency: Vec<CurrencyTotal>,
    /// By category, then descending total.
    pub by_category_currency: Vec<CategoryCurrencyTotal>,
    /// By month, then currency.
    pub by_month_currency: Vec<MonthCurrencyTotal>,
    pub totals: Totals,
}

/// Totals converted into a single display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedSummary {
    /// Descending converted total.
    pub by_category: Vec<CategoryTotal>,
    /// Ascending month.
    pub by_month: Vec<MonthTotal>,
    pub totals: Totals,
    /// The code every total is expressed in.
    pub display_currency: String,
}

/// The per-currency breakdowns that conversion starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyBreakdowns {
    pub by_category_currency: Vec<CategoryCurrencyTotal>,
    pub by_month_currency: Vec<MonthCurrencyTotal>,
}

impl CurrencyBreakdowns {
    /// Every currency that appears in either breakdown, without duplicates.
    pub fn currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = self
            .by_category_currency
            .iter()
            .map(|row| row.currency)
            .chain(self.by_month_currency.iter().map(|row| row.currency))
            .collect();

        currencies.sort_by_key(Currency::as_str);
        currencies.dedup();
        currencies
    }
}

/// Build the unconverted summary.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn build_summary(connection: &Connection) -> Result<Summary, Error> {
    let mut by_category = aggregate_expenses(&[Dimension::Category], connection)?;
    by_category.sort_by_key(|row| Reverse(row.total_cents));

    let by_month = aggregate_expenses(&[Dimension::Month], connection)?;

    let mut by_currency = aggregate_expenses(&[Dimension::Currency], connection)?;
    by_currency.sort_by_key(|row| Reverse(row.total_cents));

    let CurrencyBreakdowns {
        by_category_currency,
        by_month_currency,
    } = get_currency_breakdowns(connection)?;

    let totals = aggregate_expenses(&[], connection)?
        .first()
        .map(|row| Totals {
            total: row.total(),
            count: row.count,
            average: row.average(),
        })
        .unwrap_or_default();

    Ok(Summary {
        by_category: by_category
            .iter()
            .filter_map(|row| {
                Some(CategoryTotal {
                    category: row.key.category?,
                    total: row.total(),
                    count: row.count,
                })
            })
            .collect(),
        by_month: by_month
            .iter()
            .filter_map(|row| {
                Some(MonthTotal {
                    month: row.key.month?.to_string(),
                    total: row.total(),
                    count: row.count,
                })
            })
            .collect(),
        by_currency: by_currency
            .iter()
            .filter_map(|row| {
                Some(CurrencyTotal {
                    currency: row.key.currency?,
                    total: row.total(),
                    count: row.count,
                    average: row.average(),
                })
            })
            .collect(),
        by_category_currency,
        by_month_currency,
        totals,
    })
}

/// Get the (category, currency) and (month, currency) breakdowns.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_currency_breakdowns(connection: &Connection) -> Result<CurrencyBreakdowns, Error> {
    let mut by_category_currency =
        aggregate_expenses(&[Dimension::Category, Dimension::Currency], connection)?;
    by_category_currency.sort_by_key(|row: &ExpenseAggregate| {
        (
            row.key.category.map(|category| category.as_str()),
            Reverse(row.total_cents),
        )
    });

    let by_month_currency =
        aggregate_expenses(&[Dimension::Month, Dimension::Currency], connection)?;

    Ok(CurrencyBreakdowns {
        by_category_currency: by_category_currency
            .iter()
            .filter_map(|row| {
                Some(CategoryCurrencyTotal {
                    category: row.key.category?,
                    currency: row.key.currency?,
                    total: row.total(),
                    count: row.count,
                })
            })
            .collect(),
        by_month_currency: by_month_currency
            .iter()
            .filter_map(|row| {
                Some(MonthCurrencyTotal {
                    month: row.key.month?.to_string(),
                    currency: row.key.currency?,
                    total: row.total(),
                    count: row.count,
                })
            })
            .collect(),
    })
}

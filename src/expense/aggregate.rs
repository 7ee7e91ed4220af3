//! Grouped totals over the expense table.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    expense::{Category, Currency},
};

/// A column that expenses can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Group by category.
    Category,
    /// Group by currency.
    Currency,
    /// Group by the first day of the month of the expense date.
    Month,
}

impl Dimension {
    fn column(&self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::Currency => "currency",
            Dimension::Month => "strftime('%Y-%m-01', date)",
        }
    }
}

/// The values shared by every expense in one group.
///
/// Only the dimensions that were grouped by are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GroupKey {
    /// The category of the group.
    pub category: Option<Category>,
    /// The currency of the group.
    pub currency: Option<Currency>,
    /// The truncated month of the group.
    pub month: Option<Date>,
}

/// The sum, count and average of the amounts in one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseAggregate {
    /// What the expenses in the group have in common.
    pub key: GroupKey,
    /// The exact sum of the amounts, in cents.
    pub total_cents: i64,
    /// The number of expenses in the group.
    pub count: i64,
    /// The mean amount, in cents.
    pub average_cents: f64,
}

impl ExpenseAggregate {
    /// The sum of the amounts in whole currency units.
    pub fn total(&self) -> f64 {
        self.total_cents as f64 / 100.0
    }

    /// The mean amount in whole currency units.
    pub fn average(&self) -> f64 {
        self.average_cents / 100.0
    }
}

/// Sum, count and average every expense grouped by `dimensions`.
///
/// Groups are ordered by the grouped columns in ascending order. With no
/// dimensions, a single row of grand totals is returned, which is all zeros
/// for an empty table.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn aggregate_expenses(
    dimensions: &[Dimension],
    connection: &Connection,
) -> Result<Vec<ExpenseAggregate>, Error> {
    let columns: Vec<&str> = dimensions.iter().map(Dimension::column).collect();
    let mut query = String::from("SELECT ");

    for column in &columns {
        query.push_str(column);
        query.push_str(", ");
    }

    query.push_str(
        "COALESCE(SUM(amount_cents), 0), COUNT(id), COALESCE(AVG(amount_cents), 0.0) FROM expense",
    );

    if !columns.is_empty() {
        let group_by = columns.join(", ");
        query.push_str(&format!(" GROUP BY {group_by} ORDER BY {group_by}"));
    }

    connection
        .prepare(&query)?
        .query_map([], |row| map_aggregate_row(row, dimensions))?
        .map(|maybe_aggregate| maybe_aggregate.map_err(Error::from))
        .collect()
}

fn map_aggregate_row(row: &Row, dimensions: &[Dimension]) -> Result<ExpenseAggregate, rusqlite::Error> {
    let mut key = GroupKey::default();

    for (index, dimension) in dimensions.iter().enumerate() {
        match dimension {
            Dimension::Category => key.category = Some(row.get(index)?),
            Dimension::Currency => key.currency = Some(row.get(index)?),
            Dimension::Month => key.month = Some(row.get(index)?),
        }
    }

    let offset = dimensions.len();

    Ok(ExpenseAggregate {
        key,
        total_cents: row.get(offset)?,
        count: row.get(offset + 1)?,
        average_cents: row.get(offset + 2)?,
    })
}

//! The JSON representation of an expense sent to clients.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{Category, Currency, Expense, core::format_timestamp},
};

/// An expense encoded for a response body.
///
/// Every value that JSON cannot carry exactly is converted to a string here:
/// the amount keeps both decimal places and dates and timestamps are ISO-8601.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseView {
    pub id: ExpenseId,
    pub amount: String,
    pub currency: Currency,
    pub category: Category,
    pub date: String,
    pub description: String,
    pub merchant: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<&Expense> for ExpenseView {
    type Error = Error;

    fn try_from(expense: &Expense) -> Result<Self, Self::Error> {
        Ok(Self {
            id: expense.id,
            amount: expense.amount.to_string(),
            currency: expense.currency,
            category: expense.category,
            date: expense.date.to_string(),
            description: expense.description.clone(),
            merchant: expense.merchant.clone(),
            created_at: format_timestamp(expense.created_at)?,
            updated_at: format_timestamp(expense.updated_at)?,
        })
    }
}

/// Encode a list of expenses, stopping at the first that cannot be encoded.
pub fn encode_expenses(expenses: &[Expense]) -> Result<Vec<ExpenseView>, Error> {
    expenses.iter().map(ExpenseView::try_from).collect()
}

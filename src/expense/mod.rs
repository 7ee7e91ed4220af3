//! Expense management.
//!
//! This module contains everything related to expenses:
//! - The [Expense] model, its domain types and [ExpenseBuilder] for creating expenses
//! - Database functions for storing, querying, grouping and deleting expenses
//! - Validation of request bodies and the JSON encoding of responses
//! - The CRUD route handlers

mod aggregate;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod domain;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod payload;
mod state;
mod view;

pub use aggregate::{Dimension, ExpenseAggregate, aggregate_expenses};
pub use core::{
    Expense, ExpenseBuilder, ExpenseFilter, create_expense, create_expense_table, delete_expense,
    get_expense, list_expenses, update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use domain::{Amount, AmountError, Category, Currency};
pub use edit_endpoint::{replace_expense_endpoint, update_expense_endpoint};
pub use get_endpoint::get_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use state::ExpenseState;

#[cfg(test)]
pub use core::count_expenses;

//! Replacing and partially updating expenses.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{
    Error,
    database_id::ExpenseId,
    db::lock_connection,
    expense::{
        ExpenseState, get_expense,
        payload::{ExpenseChanges, ExpensePayload},
        update_expense,
        view::ExpenseView,
    },
    validation::ValidationErrors,
};

/// A route handler for replacing an expense (PUT).
///
/// `amount`, `category` and `date` must be supplied, other omitted fields
/// keep their stored values.
pub async fn replace_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<ExpenseView>, Error> {
    edit_expense(state, expense_id, payload, ExpensePayload::into_replacement)
}

/// A route handler for partially updating an expense (PATCH).
///
/// Only the supplied fields are validated and changed.
pub async fn update_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<Json<ExpenseView>, Error> {
    edit_expense(state, expense_id, payload, ExpensePayload::into_changes)
}

fn edit_expense(
    state: ExpenseState,
    expense_id: ExpenseId,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
    validate: fn(ExpensePayload) -> Result<ExpenseChanges, ValidationErrors>,
) -> Result<Json<ExpenseView>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let mut expense = get_expense(expense_id, &connection)?;

    let Json(payload) = payload?;
    validate(payload)?.apply_to(&mut expense);

    let expense = update_expense(&expense, &connection)?;
    tracing::debug!("Updated expense {expense_id}");

    Ok(Json(ExpenseView::try_from(&expense)?))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    Error,
    database_id::ExpenseId,
    db::lock_connection,
    expense::{ExpenseState, delete_expense},
};

/// A route handler for deleting an expense, responds with 204 No Content.
pub async fn delete_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<StatusCode, Error> {
    let connection = lock_connection(&state.db_connection)?;
    delete_expense(expense_id, &connection)?;
    tracing::debug!("Deleted expense {expense_id}");

    Ok(StatusCode::NO_CONTENT)
}

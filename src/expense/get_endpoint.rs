use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    database_id::ExpenseId,
    db::lock_connection,
    expense::{ExpenseState, get_expense, view::ExpenseView},
};

/// A route handler that responds with a single expense, or 404 if there is
/// no expense with the ID.
pub async fn get_expense_endpoint(
    State(state): State<ExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<ExpenseView>, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let expense = get_expense(expense_id, &connection)?;

    Ok(Json(ExpenseView::try_from(&expense)?))
}

//! Creating expenses.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    Error,
    db::lock_connection,
    expense::{ExpenseState, create_expense, payload::ExpensePayload, view::ExpenseView},
};

/// A route handler for creating a new expense, responds with the stored
/// expense and 201 Created.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    payload: Result<Json<ExpensePayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), Error> {
    let Json(payload) = payload?;
    let builder = payload.into_new_expense()?;

    let connection = lock_connection(&state.db_connection)?;
    let expense = create_expense(builder, &connection)?;
    tracing::debug!("Created expense {}", expense.id);

    Ok((StatusCode::CREATED, Json(ExpenseView::try_from(&expense)?)))
}

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState, build_router,
    expense::{Expense, ExpenseBuilder, create_expense},
    rates::ExchangeRateGateway,
    test_utils::StubRateProvider,
};

pub(crate) fn must_create_test_state(provider: StubRateProvider) -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, ExchangeRateGateway::new(provider))
        .expect("Could not create app state")
}

pub(crate) fn must_create_test_server(state: AppState) -> TestServer {
    TestServer::try_new(build_router(state)).expect("Could not create test server.")
}

pub(crate) fn must_insert_expense(state: &AppState, builder: ExpenseBuilder) -> Expense {
    let connection = state
        .db_connection
        .lock()
        .expect("Could not acquire database connection");

    create_expense(builder, &connection).expect("Could not create test expense")
}

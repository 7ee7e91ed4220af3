//! Listing and filtering expenses.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    Error,
    db::lock_connection,
    expense::{
        Category, Currency, ExpenseFilter, ExpenseState, list_expenses,
        view::{ExpenseView, encode_expenses},
    },
    validation::ValidationErrors,
};

/// The optional filters for the expense list.
///
/// Blank values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    category: Option<String>,
    currency: Option<String>,
    search: Option<String>,
}

impl ListExpensesQuery {
    fn into_filter(self) -> Result<ExpenseFilter, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let category = non_blank(self.category)
            .and_then(|text| parse_choice::<Category>("category", &text, &mut errors));
        let currency = non_blank(self.currency)
            .and_then(|text| parse_choice::<Currency>("currency", &text, &mut errors));
        let search = non_blank(self.search);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ExpenseFilter {
            category,
            currency,
            search,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}

fn parse_choice<T: std::str::FromStr>(
    field: &str,
    text: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match text.parse() {
        Ok(choice) => Some(choice),
        Err(_) => {
            errors.add(
                field,
                format!("Select a valid choice. {text} is not one of the available choices."),
            );
            None
        }
    }
}

/// A route handler that responds with every expense matching the query,
/// most recent first.
pub async fn list_expenses_endpoint(
    State(state): State<ExpenseState>,
    Query(query): Query<ListExpensesQuery>,
) -> Result<Json<Vec<ExpenseView>>, Error> {
    let filter = query.into_filter()?;
    let connection = lock_connection(&state.db_connection)?;

    let expenses = list_expenses(&filter, &connection)?;

    Ok(Json(encode_expenses(&expenses)?))
}

#[cfg(test)]
mod list_expenses_endpoint_tests {
    use serde_json::{Value, json};
    use time::macros::date;

    use crate::{
        endpoints,
        expense::{Amount, Category, Currency, Expense, view::ExpenseView},
        test_utils::{
            StubRateProvider, must_create_test_server, must_create_test_state, must_insert_expense,
        },
    };

    #[tokio::test]
    async fn lists_empty_table() {
        let server = must_create_test_server(must_create_test_state(StubRateProvider::default()));

        let response = server.get(endpoints::EXPENSES).await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn lists_most_recent_first() {
        let state = must_create_test_state(StubRateProvider::default());
        let january = must_insert_expense(
            &state,
            Expense::build(Amount::from_cents(100), Category::Food, date!(2024 - 01 - 15)),
        );
        let march = must_insert_expense(
            &state,
            Expense::build(Amount::from_cents(200), Category::Food, date!(2024 - 03 - 15)),
        );
        let server = must_create_test_server(state);

        let got: Vec<ExpenseView> = server.get(endpoints::EXPENSES).await.json();

        let ids: Vec<_> = got.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![march.id, january.id]);
        assert_eq!(got[0].amount, "2.00");
    }

    #[tokio::test]
    async fn filters_by_query() {
        let state = must_create_test_state(StubRateProvider::default());
        let day = date!(2024 - 01 - 15);
        let want = must_insert_expense(
            &state,
            Expense::build(Amount::from_cents(100), Category::Food, day)
                .currency(Currency::Eur)
                .merchant("Corner Bakery"),
        );
        must_insert_expense(
            &state,
            Expense::build(Amount::from_cents(200), Category::Food, day).merchant("Bakery Two"),
        );
        must_insert_expense(
            &state,
            Expense::build(Amount::from_cents(300), Category::Bills, day).currency(Currency::Eur),
        );
        let server = must_create_test_server(state);

        let got: Vec<ExpenseView> = server
            .get(endpoints::EXPENSES)
            .add_query_param("category", "food")
            .add_query_param("currency", "EUR")
            .add_query_param("search", "bakery")
            .await
            .json();

        let ids: Vec<_> = got.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![want.id]);
    }

    #[tokio::test]
    async fn blank_filters_are_ignored() {
        let state = must_create_test_state(StubRateProvider::default());
        must_insert_expense(
            &state,
            Expense::build(Amount::from_cents(100), Category::Food, date!(2024 - 01 - 15)),
        );
        let server = must_create_test_server(state);

        let got: Vec<Value> = server
            .get(endpoints::EXPENSES)
            .add_query_param("category", "")
            .add_query_param("search", "  ")
            .await
            .json();

        assert_eq!(got.len(), 1);
    }

    #[tokio::test]
    async fn invalid_filter_is_bad_request() {
        let server = must_create_test_server(must_create_test_state(StubRateProvider::default()));

        let response = server
            .get(endpoints::EXPENSES)
            .add_query_param("category", "fun")
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "category": ["Select a valid choice. fun is not one of the available choices."]
        }));
    }
}

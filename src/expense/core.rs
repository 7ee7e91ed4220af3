//! Defines the expense model and the database queries for storing it.

use rusqlite::{Connection, Row, named_params, types::Type};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

use crate::{
    Error,
    database_id::ExpenseId,
    expense::{Amount, Category, Currency},
};

// ============================================================================
// MODELS
// ============================================================================

/// A recorded payment: how much was spent, in which currency, on what and when.
///
/// To create a new `Expense`, use [Expense::build] and [create_expense].
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How much was spent.
    pub amount: Amount,
    /// The currency `amount` is in.
    pub currency: Currency,
    /// What the money was spent on.
    pub category: Category,
    /// The day the money was spent.
    pub date: Date,
    /// Free text notes about the expense.
    pub description: String,
    /// Who was paid.
    pub merchant: String,
    /// When the expense was first recorded.
    pub created_at: OffsetDateTime,
    /// When the expense was last changed.
    pub updated_at: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(amount: Amount, category: Category, date: Date) -> ExpenseBuilder {
        ExpenseBuilder {
            amount,
            currency: Currency::default(),
            category,
            date,
            description: String::new(),
            merchant: String::new(),
        }
    }
}

/// A builder for expenses that have not been stored yet.
///
/// The currency defaults to USD and the description and merchant default to
/// empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// How much was spent.
    pub amount: Amount,
    /// The currency `amount` is in.
    pub currency: Currency,
    /// What the money was spent on.
    pub category: Category,
    /// The day the money was spent.
    pub date: Date,
    /// Free text notes about the expense.
    pub description: String,
    /// Who was paid, at most 255 characters.
    pub merchant: String,
}

impl ExpenseBuilder {
    /// Set the currency of the expense.
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Set the description of the expense.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the merchant of the expense.
    pub fn merchant(mut self, merchant: &str) -> Self {
        self.merchant = merchant.to_owned();
        self
    }
}

/// Restricts which expenses [list_expenses] returns.
///
/// Fields left as `None` do not filter anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// Only expenses in this category.
    pub category: Option<Category>,
    /// Only expenses paid in this currency.
    pub currency: Option<Currency>,
    /// Only expenses whose description or merchant contains this text,
    /// ignoring case.
    pub search: Option<String>,
}

// ============================================================================
// TIMESTAMPS
// ============================================================================

/// ISO-8601 in UTC with a fixed number of fractional digits, so that sorting
/// the text also sorts the timestamps.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// The current time in UTC at microsecond precision, the precision timestamps
/// are stored with.
pub(crate) fn current_timestamp() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    now.replace_microsecond(now.microsecond()).unwrap_or(now)
}

/// Format `timestamp` as an ISO-8601 UTC string, e.g. `2024-01-15T09:30:00.000000Z`.
///
/// # Errors
/// Returns an [Error::TimestampFormat] if the timestamp cannot be represented,
/// e.g. a year beyond 9999.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, Error> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .map_err(|error| Error::TimestampFormat(error.to_string()))
}

fn parse_timestamp(text: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(text, TIMESTAMP_FORMAT).map(PrimitiveDateTime::assume_utc)
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Store a new expense and return it with its generated ID and timestamps.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_expense(builder: ExpenseBuilder, connection: &Connection) -> Result<Expense, Error> {
    let now = format_timestamp(current_timestamp())?;

    connection
        .prepare(
            "INSERT INTO expense
                (amount_cents, currency, category, date, description, merchant, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING id, amount_cents, currency, category, date, description, merchant, created_at, updated_at",
        )?
        .query_row(
            (
                builder.amount.cents(),
                builder.currency,
                builder.category,
                builder.date,
                builder.description,
                builder.merchant,
                now,
            ),
            map_expense_row,
        )
        .map_err(Error::from)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a stored expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, amount_cents, currency, category, date, description, merchant, created_at, updated_at
             FROM expense WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_expense_row)
        .map_err(Error::from)
}

/// Retrieve the expenses matching `filter`, most recent first.
///
/// Expenses are ordered by descending date, then descending creation time.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn list_expenses(filter: &ExpenseFilter, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, amount_cents, currency, category, date, description, merchant, created_at, updated_at
             FROM expense
             WHERE (:category IS NULL OR category = :category)
               AND (:currency IS NULL OR currency = :currency)
               AND (:search IS NULL
                    OR instr(lower(description), lower(:search)) > 0
                    OR instr(lower(merchant), lower(:search)) > 0)
             ORDER BY date DESC, created_at DESC, id DESC",
        )?
        .query_map(
            named_params! {
                ":category": filter.category,
                ":currency": filter.currency,
                ":search": filter.search,
            },
            map_expense_row,
        )?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Overwrite the stored fields of `expense` and refresh its `updated_at` timestamp.
///
/// The ID and creation time are never changed. The returned expense reflects
/// what was stored.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingExpense] if the expense is not in the database,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(expense: &Expense, connection: &Connection) -> Result<Expense, Error> {
    let updated_at = format_timestamp(current_timestamp())?;

    connection
        .prepare(
            "UPDATE expense
             SET amount_cents = ?1,
                 currency = ?2,
                 category = ?3,
                 date = ?4,
                 description = ?5,
                 merchant = ?6,
                 updated_at = max(?7, created_at)
             WHERE id = ?8
             RETURNING id, amount_cents, currency, category, date, description, merchant, created_at, updated_at",
        )?
        .query_row(
            (
                expense.amount.cents(),
                expense.currency,
                expense.category,
                expense.date,
                &expense.description,
                &expense.merchant,
                updated_at,
                expense.id,
            ),
            map_expense_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingExpense,
            error => error.into(),
        })
}

/// Delete an expense by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if the expense is not in the database,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
#[cfg(test)]
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense", [], |row| row.get(0))
        .map_err(Error::from)
}

/// Create the expense table in the database.
///
/// The category and currency columns are constrained to the supported choices.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount_cents INTEGER NOT NULL,
            currency TEXT NOT NULL DEFAULT 'USD'
                CHECK (currency IN ('USD', 'EUR', 'GBP', 'JPY', 'INR')),
            category TEXT NOT NULL
                CHECK (category IN ('food', 'transport', 'bills', 'shopping', 'other')),
            date TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            merchant TEXT NOT NULL DEFAULT '' CHECK (length(merchant) <= 255),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL CHECK (updated_at >= created_at)
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date_created_at ON expense(date, created_at);",
    )
}

/// Map a database row to an [Expense].
fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = Amount::from_cents(row.get(1)?);
    let currency = row.get(2)?;
    let category = row.get(3)?;
    let date = row.get(4)?;
    let description = row.get(5)?;
    let merchant = row.get(6)?;
    let created_at = get_timestamp(row, 7)?;
    let updated_at = get_timestamp(row, 8)?;

    Ok(Expense {
        id,
        amount,
        currency,
        category,
        date,
        description,
        merchant,
        created_at,
        updated_at,
    })
}

fn get_timestamp(row: &Row, index: usize) -> Result<OffsetDateTime, rusqlite::Error> {
    let text: String = row.get(index)?;

    parse_timestamp(&text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        expense::{
            Amount, Category, Currency, Expense, ExpenseFilter, count_expenses, create_expense,
            delete_expense, get_expense, list_expenses, update_expense,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn amount(text: &str) -> Amount {
        text.parse().unwrap()
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let expense = create_expense(
            Expense::build(amount("12.30"), Category::Food, date!(2024 - 01 - 15))
                .currency(Currency::Eur)
                .description("Lunch")
                .merchant("Cafe"),
            &conn,
        )
        .expect("Could not create expense");

        assert_eq!(expense.id, 1);
        assert_eq!(expense.amount.to_string(), "12.30");
        assert_eq!(expense.currency, Currency::Eur);
        assert_eq!(expense.category, Category::Food);
        assert_eq!(expense.date, date!(2024 - 01 - 15));
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.merchant, "Cafe");
        assert_eq!(expense.created_at, expense.updated_at);
    }

    #[test]
    fn create_uses_defaults() {
        let conn = get_test_connection();

        let expense = create_expense(
            Expense::build(amount("1"), Category::Other, date!(2024 - 01 - 15)),
            &conn,
        )
        .unwrap();

        assert_eq!(expense.currency, Currency::Usd);
        assert_eq!(expense.description, "");
        assert_eq!(expense.merchant, "");
    }

    #[test]
    fn get_returns_stored_expense() {
        let conn = get_test_connection();
        let want = create_expense(
            Expense::build(amount("99.99"), Category::Bills, date!(2024 - 02 - 01)),
            &conn,
        )
        .unwrap();

        let got = get_expense(want.id, &conn).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn get_fails_on_unknown_id() {
        let conn = get_test_connection();

        assert_eq!(get_expense(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn list_orders_by_date_then_creation_time() {
        let conn = get_test_connection();
        let older = create_expense(
            Expense::build(amount("1"), Category::Food, date!(2024 - 01 - 01)),
            &conn,
        )
        .unwrap();
        let first_same_day = create_expense(
            Expense::build(amount("2"), Category::Food, date!(2024 - 03 - 01)),
            &conn,
        )
        .unwrap();
        let newest = create_expense(
            Expense::build(amount("3"), Category::Food, date!(2024 - 06 - 01)),
            &conn,
        )
        .unwrap();
        let second_same_day = create_expense(
            Expense::build(amount("4"), Category::Food, date!(2024 - 03 - 01)),
            &conn,
        )
        .unwrap();

        let got: Vec<_> = list_expenses(&ExpenseFilter::default(), &conn)
            .unwrap()
            .into_iter()
            .map(|expense| expense.id)
            .collect();

        assert_eq!(
            got,
            vec![newest.id, second_same_day.id, first_same_day.id, older.id]
        );
    }

    #[test]
    fn list_filters_by_category_and_currency() {
        let conn = get_test_connection();
        let day = date!(2024 - 01 - 15);
        let want = create_expense(
            Expense::build(amount("1"), Category::Food, day).currency(Currency::Eur),
            &conn,
        )
        .unwrap();
        create_expense(Expense::build(amount("2"), Category::Food, day), &conn).unwrap();
        create_expense(
            Expense::build(amount("3"), Category::Transport, day).currency(Currency::Eur),
            &conn,
        )
        .unwrap();

        let got = list_expenses(
            &ExpenseFilter {
                category: Some(Category::Food),
                currency: Some(Currency::Eur),
                search: None,
            },
            &conn,
        )
        .unwrap();

        assert_eq!(got, vec![want]);
    }

    #[test]
    fn list_searches_description_and_merchant_ignoring_case() {
        let conn = get_test_connection();
        let day = date!(2024 - 01 - 15);
        let by_description = create_expense(
            Expense::build(amount("1"), Category::Food, day).description("Coffee beans"),
            &conn,
        )
        .unwrap();
        let by_merchant = create_expense(
            Expense::build(amount("2"), Category::Food, day).merchant("COFFEE Corner"),
            &conn,
        )
        .unwrap();
        create_expense(
            Expense::build(amount("3"), Category::Food, day).description("Tea"),
            &conn,
        )
        .unwrap();

        let got: Vec<_> = list_expenses(
            &ExpenseFilter {
                search: Some("coffee".to_owned()),
                ..Default::default()
            },
            &conn,
        )
        .unwrap()
        .into_iter()
        .map(|expense| expense.id)
        .collect();

        assert_eq!(got, vec![by_merchant.id, by_description.id]);
    }

    #[test]
    fn update_overwrites_fields_and_keeps_creation_time() {
        let conn = get_test_connection();
        let mut expense = create_expense(
            Expense::build(amount("1.23"), Category::Food, date!(2024 - 01 - 15)),
            &conn,
        )
        .unwrap();
        expense.amount = amount("3.21");
        expense.currency = Currency::Gbp;
        expense.category = Category::Shopping;
        expense.date = date!(2024 - 01 - 16);
        expense.description = "Socks".to_owned();
        expense.merchant = "Market".to_owned();

        let updated = update_expense(&expense, &conn).unwrap();

        assert_eq!(updated.amount, expense.amount);
        assert_eq!(updated.currency, Currency::Gbp);
        assert_eq!(updated.category, Category::Shopping);
        assert_eq!(updated.date, date!(2024 - 01 - 16));
        assert_eq!(updated.description, "Socks");
        assert_eq!(updated.merchant, "Market");
        assert_eq!(updated.created_at, expense.created_at);
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(get_expense(expense.id, &conn).unwrap(), updated);
    }

    #[test]
    fn update_fails_on_unknown_id() {
        let conn = get_test_connection();
        let mut expense = create_expense(
            Expense::build(amount("1"), Category::Food, date!(2024 - 01 - 15)),
            &conn,
        )
        .unwrap();
        expense.id = 1337;

        assert_eq!(
            update_expense(&expense, &conn),
            Err(Error::UpdateMissingExpense)
        );
    }

    #[test]
    fn delete_removes_expense() {
        let conn = get_test_connection();
        let expense = create_expense(
            Expense::build(amount("1"), Category::Food, date!(2024 - 01 - 15)),
            &conn,
        )
        .unwrap();

        delete_expense(expense.id, &conn).unwrap();

        assert_eq!(get_expense(expense.id, &conn), Err(Error::NotFound));
        assert_eq!(count_expenses(&conn), Ok(0));
    }

    #[test]
    fn delete_fails_on_unknown_id() {
        let conn = get_test_connection();

        assert_eq!(delete_expense(7, &conn), Err(Error::DeleteMissingExpense));
    }

    #[test]
    fn table_rejects_unknown_category() {
        let conn = get_test_connection();

        let result = conn.execute(
            "INSERT INTO expense (amount_cents, category, date, created_at, updated_at)
             VALUES (100, 'fun', '2024-01-15', '2024-01-15T00:00:00.000000Z', '2024-01-15T00:00:00.000000Z')",
            (),
        );

        assert!(result.is_err());
        assert_eq!(count_expenses(&conn), Ok(0));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_expense(
                Expense::build(Amount::from_cents(i), Category::Food, date!(2024 - 01 - 15)),
                &conn,
            )
            .unwrap();
        }

        assert_eq!(count_expenses(&conn), Ok(want_count as u32));
    }
}

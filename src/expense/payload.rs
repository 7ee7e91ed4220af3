//! Decoding and validation of expense request bodies.
//!
//! Bodies are read as raw JSON objects so that every field can be checked and
//! every problem reported at once, keyed by field name.

use serde::Deserialize;
use serde_json::{Map, Value};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    expense::{Amount, AmountError, Category, Currency, Expense, ExpenseBuilder},
    validation::{NOT_A_STRING, NOT_NULL, REQUIRED, ValidationErrors},
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DATE_FORMAT_MESSAGE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
const MERCHANT_MAX_LENGTH: usize = 255;

/// The JSON object sent to create, replace or partially update an expense.
///
/// Unknown fields, as well as the read-only `id`, `created_at` and
/// `updated_at`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ExpensePayload(Map<String, Value>);

/// Validated changes to apply to a stored expense.
///
/// Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    /// The new amount.
    pub amount: Option<Amount>,
    /// The new currency.
    pub currency: Option<Currency>,
    /// The new category.
    pub category: Option<Category>,
    /// The new date.
    pub date: Option<Date>,
    /// The new description.
    pub description: Option<String>,
    /// The new merchant.
    pub merchant: Option<String>,
}

impl ExpenseChanges {
    /// Overwrite the fields of `expense` that have a new value.
    pub fn apply_to(self, expense: &mut Expense) {
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(currency) = self.currency {
            expense.currency = currency;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(description) = self.description {
            expense.description = description;
        }
        if let Some(merchant) = self.merchant {
            expense.merchant = merchant;
        }
    }
}

impl ExpensePayload {
    /// Validate the payload for creating an expense.
    ///
    /// `amount`, `category` and `date` are required. The currency defaults to
    /// USD and the description and merchant default to empty strings.
    ///
    /// # Errors
    /// Returns every problem found, keyed by field name.
    pub fn into_new_expense(self) -> Result<ExpenseBuilder, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let changes = self.changes(true, &mut errors);

        match changes {
            ExpenseChanges {
                amount: Some(amount),
                currency,
                category: Some(category),
                date: Some(date),
                description,
                merchant,
            } if errors.is_empty() => Ok(Expense::build(amount, category, date)
                .currency(currency.unwrap_or_default())
                .description(description.as_deref().unwrap_or_default())
                .merchant(merchant.as_deref().unwrap_or_default())),
            _ => Err(errors),
        }
    }

    /// Validate the payload for replacing an expense.
    ///
    /// `amount`, `category` and `date` are required, omitted optional fields
    /// keep their stored values.
    ///
    /// # Errors
    /// Returns every problem found, keyed by field name.
    pub fn into_replacement(self) -> Result<ExpenseChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let changes = self.changes(true, &mut errors);

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    /// Validate the payload for a partial update, only the supplied fields
    /// are checked.
    ///
    /// # Errors
    /// Returns every problem found, keyed by field name.
    pub fn into_changes(self) -> Result<ExpenseChanges, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let changes = self.changes(false, &mut errors);

        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }

    fn changes(&self, require_core_fields: bool, errors: &mut ValidationErrors) -> ExpenseChanges {
        ExpenseChanges {
            amount: self.field("amount", require_core_fields, parse_amount, errors),
            currency: self.field("currency", false, parse_currency, errors),
            category: self.field("category", require_core_fields, parse_category, errors),
            date: self.field("date", require_core_fields, parse_date, errors),
            description: self.field("description", false, parse_text, errors),
            merchant: self.field("merchant", false, parse_merchant, errors),
        }
    }

    fn field<T>(
        &self,
        name: &str,
        required: bool,
        parse: fn(&Value) -> Result<T, String>,
        errors: &mut ValidationErrors,
    ) -> Option<T> {
        match self.0.get(name) {
            None => {
                if required {
                    errors.add(name, REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                errors.add(name, NOT_NULL);
                None
            }
            Some(value) => parse(value)
                .map_err(|message| errors.add(name, message))
                .ok(),
        }
    }
}

fn parse_amount(value: &Value) -> Result<Amount, String> {
    let parsed: Result<Amount, AmountError> = match value {
        Value::String(text) => text.parse(),
        Value::Number(number) => number.to_string().parse(),
        _ => Err(AmountError::NotANumber),
    };

    parsed.map_err(|error| error.to_string())
}

fn parse_currency(value: &Value) -> Result<Currency, String> {
    match value {
        Value::String(text) => text
            .parse::<Currency>()
            .map_err(|error| error.to_string()),
        other => Err(format!("\"{other}\" is not a valid choice.")),
    }
}

fn parse_category(value: &Value) -> Result<Category, String> {
    match value {
        Value::String(text) => text
            .parse::<Category>()
            .map_err(|error| error.to_string()),
        other => Err(format!("\"{other}\" is not a valid choice.")),
    }
}

fn parse_date(value: &Value) -> Result<Date, String> {
    value
        .as_str()
        .and_then(|text| Date::parse(text.trim(), DATE_FORMAT).ok())
        .ok_or_else(|| DATE_FORMAT_MESSAGE.to_owned())
}

/// Numbers are accepted and stored as their text.
fn parse_text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text.trim().to_owned()),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(NOT_A_STRING.to_owned()),
    }
}

fn parse_merchant(value: &Value) -> Result<String, String> {
    let merchant = parse_text(value)?;

    if merchant.chars().count() > MERCHANT_MAX_LENGTH {
        return Err(format!(
            "Ensure this field has no more than {MERCHANT_MAX_LENGTH} characters."
        ));
    }

    Ok(merchant)
}

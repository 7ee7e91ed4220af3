//! Core expense domain types: the closed category and currency sets and the
//! fixed-point amount.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A value that is not a member of a closed set of choices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("\"{0}\" is not a valid choice.")]
pub struct UnknownChoice(pub String);

/// What an expense was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Groceries, restaurants and takeaways.
    Food,
    /// Fuel, fares and parking.
    Transport,
    /// Rent, utilities and subscriptions.
    Bills,
    /// Everything bought in a shop that is not food.
    Shopping,
    /// Anything else.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Shopping,
        Category::Other,
    ];

    /// The wire and database representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Bills => "bills",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The currency an expense was paid in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// United States dollar.
    #[default]
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Japanese yen.
    Jpy,
    /// Indian rupee.
    Inr,
}

impl Currency {
    /// Every supported currency.
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Inr,
    ];

    /// The ISO 4217 code of the currency.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Inr => "INR",
        }
    }
}

impl FromStr for Currency {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|currency| currency.as_str() == s)
            .ok_or_else(|| UnknownChoice(s.to_owned()))
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// The maximum number of digits in an amount.
const MAX_DIGITS: u32 = 12;
/// The number of digits after the decimal point.
const DECIMAL_PLACES: u32 = 2;

/// The reasons a value cannot be used as an [Amount].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// The value could not be parsed as a decimal number.
    #[error("A valid number is required.")]
    NotANumber,
    /// The value has more than twelve significant digits.
    #[error("Ensure that there are no more than 12 digits in total.")]
    TooManyDigits,
    /// The value has more than two digits after the decimal point.
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimalPlaces,
    /// The value has more than ten digits before the decimal point.
    #[error("Ensure that there are no more than 10 digits before the decimal point.")]
    TooManyWholeDigits,
}

/// A monetary amount with exactly two decimal places and at most twelve digits.
///
/// Displays with both decimal places, e.g. `12.50`, so it can be sent to
/// clients as a string without losing precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount from a decimal value.
    ///
    /// Digits are counted as written, so trailing zeros count too and `1.500`
    /// has three decimal places.
    ///
    /// # Errors
    ///
    /// Returns an [AmountError] if `value` has more than twelve significant
    /// digits, more than two decimal places, or more than ten digits before
    /// the decimal point.
    pub fn new(mut value: Decimal) -> Result<Self, AmountError> {
        let decimal_places = value.scale();
        let digits = value.mantissa().unsigned_abs().to_string().len() as u32;
        let total_digits = digits.max(decimal_places);
        let whole_digits = total_digits - decimal_places;

        if total_digits > MAX_DIGITS {
            return Err(AmountError::TooManyDigits);
        }

        if decimal_places > DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimalPlaces);
        }

        if whole_digits > MAX_DIGITS - DECIMAL_PLACES {
            return Err(AmountError::TooManyWholeDigits);
        }

        value.rescale(DECIMAL_PLACES);

        Ok(Self(value))
    }

    /// Create an amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, DECIMAL_PLACES))
    }

    /// The amount as a whole number of cents.
    pub fn cents(&self) -> i64 {
        // Twelve digits always fit in an i64.
        self.0.mantissa() as i64
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| AmountError::NotANumber)?;

        Amount::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

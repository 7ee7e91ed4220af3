//! The API endpoint URIs.
//!
//! Paths with a parameter, e.g. `/api/expenses/{expense_id}/`, are matched by the router.

/// The collection of expenses: list and create.
pub const EXPENSES: &str = "/api/expenses/";
/// A single expense: retrieve, replace, partially update and delete.
pub const EXPENSE: &str = "/api/expenses/{expense_id}/";
/// Dashboard totals over all expenses, optionally converted to one currency.
pub const EXPENSE_SUMMARY: &str = "/api/expenses/summary/";
/// A single exchange rate lookup.
pub const RATES: &str = "/api/rates/";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{expense_id}' in '/api/expenses/{expense_id}/'.
/// Only the first parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the original path is returned.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

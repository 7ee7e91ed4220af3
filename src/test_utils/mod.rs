#![allow(missing_docs)]

pub(crate) mod rates;
pub(crate) mod server;

pub(crate) use rates::StubRateProvider;
pub(crate) use server::{must_create_test_server, must_create_test_state, must_insert_expense};

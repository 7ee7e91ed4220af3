//! Application router configuration.

use axum::{
    Json, Router,
    extract::{MatchedPath, Request},
    http::{
        HeaderValue, Method, StatusCode,
        header::{ACCEPT, CONTENT_TYPE, InvalidHeaderValue},
    },
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
        list_expenses_endpoint, replace_expense_endpoint, update_expense_endpoint,
    },
    rates::get_rate_endpoint,
    summary::get_summary_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSE_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(replace_expense_endpoint)
                .patch(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(endpoints::RATES, get(get_rate_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Not found." })),
    )
        .into_response()
}

/// Wrap `router` in a layer that opens a `request` span for every request.
pub fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}

/// Build the CORS layer for browser clients served from `allowed_origins`.
///
/// Any origin is allowed when `allowed_origins` is empty.
///
/// # Errors
/// Returns an error if one of the origins is not a valid header value.
pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    if allowed_origins.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(layer.allow_origin(origins))
}

#[cfg(test)]
mod routing_tests {
    use axum::http::{HeaderValue, header::ORIGIN};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        build_router,
        test_utils::{StubRateProvider, must_create_test_server, must_create_test_state},
    };

    use super::{add_tracing_layer, cors_layer};

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = must_create_test_server(must_create_test_state(StubRateProvider::default()));

        let response = server.get("/api/nope/").await;

        response.assert_status_not_found();
        response.assert_json(&json!({"detail": "Not found."}));
    }

    #[tokio::test]
    async fn summary_is_not_mistaken_for_an_expense_id() {
        let server = must_create_test_server(must_create_test_state(StubRateProvider::default()));

        server
            .get("/api/expenses/summary/")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn allows_configured_origin() {
        let state = must_create_test_state(StubRateProvider::default());
        let layer = cors_layer(&["http://localhost:5173".to_owned()]).unwrap();
        let app = add_tracing_layer(build_router(state)).layer(layer);
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .get("/api/expenses/")
            .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5173"))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("http://localhost:5173"))
        );
    }

    #[tokio::test]
    async fn allows_any_origin_when_none_configured() {
        let state = must_create_test_state(StubRateProvider::default());
        let app = build_router(state).layer(cors_layer(&[]).unwrap());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .get("/api/expenses/")
            .add_header(ORIGIN, HeaderValue::from_static("http://example.com"))
            .await;

        assert_eq!(
            response.headers().get("access-control-allow-origin"),
            Some(&HeaderValue::from_static("*"))
        );
    }

    #[test]
    fn rejects_invalid_origin() {
        assert!(cors_layer(&["bad\norigin".to_owned()]).is_err());
    }
}

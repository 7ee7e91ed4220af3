use std::{fs::OpenOptions, net::SocketAddr, sync::Arc, time::Duration};

use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use expense_tracker::{
    AppState, DEFAULT_RATES_API_URL, DEFAULT_REQUEST_TIMEOUT, ExchangeRateGateway,
    FrankfurterProvider, add_tracing_layer, build_router, cors_layer, graceful_shutdown,
};

/// The REST API server for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Base URL of the Frankfurter compatible exchange rate API.
    #[arg(long, default_value = DEFAULT_RATES_API_URL)]
    rates_api_url: String,

    /// Seconds to wait for the exchange rate API before giving up.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    rates_timeout_secs: u64,

    /// An origin that browser clients may call the API from, e.g.
    /// `http://localhost:5173`. May be repeated. Any origin is allowed if omitted.
    #[arg(long = "allowed-origin")]
    allowed_origins: Vec<String>,

    /// File path for the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let conn = Connection::open(&args.db_path).expect("Could not open the database.");

    let provider = FrankfurterProvider::new(
        &args.rates_api_url,
        Duration::from_secs(args.rates_timeout_secs),
    )
    .expect("Could not create the exchange rate client.");

    let state = AppState::new(conn, ExchangeRateGateway::new(provider))
        .expect("Could not initialize the database.");

    let cors = cors_layer(&args.allowed_origins).expect("Invalid allowed origin.");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state)).layer(cors);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging(log_path: &str) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

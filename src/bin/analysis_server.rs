//! Stock analysis backend.
//!
//! Serves per-symbol technical reports (indicators, levels, sentiment,
//! analyst block), symbol suggestions, and the RSI-threshold backtest.
//! Bars come from the configured [`MarketData`] provider: parquet files
//! when `PARQUET_DIR` is set, the seeded mock generator otherwise.
//!
//! Run: cargo run --release --bin analysis_server

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marketpulse::analysis::{build_report, StockReport};
use marketpulse::backtest::simulate::DEFAULT_SEED;
use marketpulse::backtest::{run_threshold_backtest, ThresholdParams, ThresholdReport};
use marketpulse::error::EngineError;
use marketpulse::provider::{
    search_suggestions, MarketData, MockMarketData, ParquetMarketData, StockSuggestion,
};

/// Calendar days of history fetched for a report
const REPORT_LOOKBACK_DAYS: i64 = 90;

struct AppState {
    provider: Box<dyn MarketData>,
}

#[derive(Deserialize)]
struct SuggestionQuery {
    q: String,
}

#[derive(Deserialize)]
struct SeedQuery {
    seed: Option<u64>,
}

fn engine_error_response(err: EngineError) -> (StatusCode, String) {
    let status = match &err {
        EngineError::UnknownSymbol(_) | EngineError::NoData { .. } => StatusCode::NOT_FOUND,
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(%err, "request rejected");
    (status, err.to_string())
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Stock Analysis & Backtest API is running",
    }))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn stock_suggestions(Query(query): Query<SuggestionQuery>) -> Json<Vec<StockSuggestion>> {
    Json(search_suggestions(&query.q, 10))
}

async fn stock_info(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(seed): Query<SeedQuery>,
) -> Result<Json<StockReport>, (StatusCode, String)> {
    let symbol = symbol.trim().to_uppercase();

    let end = Utc::now().date_naive();
    let start = end - Duration::days(REPORT_LOOKBACK_DAYS);

    let bars = state
        .provider
        .fetch_bars(&symbol, start, end)
        .map_err(engine_error_response)?;
    let quote = state
        .provider
        .fetch_quote(&symbol)
        .map_err(engine_error_response)?;

    let mut rng = match seed.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    Ok(Json(build_report(&quote, &bars, &mut rng)))
}

async fn backtest(
    State(state): State<Arc<AppState>>,
    Json(mut params): Json<ThresholdParams>,
) -> Result<Json<ThresholdReport>, (StatusCode, String)> {
    params.ticker = params.ticker.trim().to_uppercase();

    let (start, end) = params
        .date_range(Utc::now().date_naive())
        .map_err(engine_error_response)?;

    let bars = state
        .provider
        .fetch_bars(&params.ticker, start, end)
        .map_err(engine_error_response)?;

    run_threshold_backtest(&bars.closes, &params)
        .map(Json)
        .map_err(engine_error_response)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let provider: Box<dyn MarketData> = match std::env::var("PARQUET_DIR") {
        Ok(dir) => {
            info!(%dir, "using parquet market data");
            Box::new(ParquetMarketData::new(dir))
        }
        Err(_) => {
            info!("using mock market data (set PARQUET_DIR for file-backed bars)");
            Box::new(MockMarketData::new(DEFAULT_SEED).unwrap())
        }
    };

    let state = Arc::new(AppState { provider });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/stock-suggestions", get(stock_suggestions))
        .route("/stock-info/{symbol}", get(stock_info))
        .route("/backtest", post(backtest))
        .layer(cors)
        .with_state(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Stock analysis server on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

//! Mock trading-platform backend.
//!
//! Serves a hardcoded stock universe with jittered quotes, portfolio
//! backtests over seeded random-walk price paths, alert checks, and market
//! status/movers. Everything is illustrative; pass `?seed=` (or
//! `config.seed` in backtest requests) for reproducible responses.
//!
//! Run: cargo run --release --bin platform_server

use std::cmp::Ordering;
use std::net::SocketAddr;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Datelike, Timelike};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marketpulse::backtest::{
    run_portfolio_backtest, BacktestConfig, BacktestIndicator, BacktestRequest, BacktestResult,
    ConditionOperator, IndicatorCondition, Portfolio,
};
use marketpulse::error::EngineError;
use marketpulse::provider::mock::{base_price, find_stock, jitter_price, MOCK_STOCKS};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct SeedQuery {
    seed: Option<u64>,
}

impl SeedQuery {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// A table row with per-request price jitter applied
#[derive(Serialize)]
struct StockQuote {
    symbol: &'static str,
    name: &'static str,
    price: f64,
    change: f64,
    change_percent: f64,
    volume: u64,
    market_cap: f64,
    pe_ratio: f64,
    dividend_yield: f64,
    fifty_two_week_high: f64,
    fifty_two_week_low: f64,
    description: &'static str,
}

fn jittered_quote(record: &'static marketpulse::provider::StockRecord, rng: &mut StdRng) -> StockQuote {
    let (price, change, change_percent) = jitter_price(record.price, rng);
    StockQuote {
        symbol: record.symbol,
        name: record.name,
        price,
        change,
        change_percent,
        volume: record.volume,
        market_cap: record.market_cap,
        pe_ratio: record.pe_ratio,
        dividend_yield: record.dividend_yield,
        fifty_two_week_high: record.fifty_two_week_high,
        fifty_two_week_low: record.fifty_two_week_low,
        description: record.description,
    }
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<StockQuote>,
}

/// Compact response kept for older clients of the plain backtest endpoint
#[derive(Serialize)]
struct LegacyBacktestResponse {
    final_value: f64,
    total_return: f64,
    total_return_pct: f64,
    sharpe_ratio: f64,
    max_drawdown: f64,
    win_rate: f64,
    total_trades: u32,
}

#[derive(Deserialize)]
struct NotificationSetup {
    symbol: String,
    #[allow(dead_code)]
    #[serde(default)]
    indicators: Vec<String>,
    #[allow(dead_code)]
    #[serde(default = "default_logic")]
    strategy_logic: String,
    #[allow(dead_code)]
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_logic() -> String {
    "AND".to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Serialize)]
struct AlertResponse {
    symbol: String,
    signal_type: &'static str,
    price: f64,
    timestamp: String,
    indicators_triggered: Vec<&'static str>,
}

// ============================================================================
// Helpers
// ============================================================================

fn engine_error_response(err: EngineError) -> (StatusCode, String) {
    let status = match &err {
        EngineError::UnknownSymbol(_) | EngineError::NoData { .. } => StatusCode::NOT_FOUND,
        e if e.is_validation() => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(%err, "request rejected");
    (status, err.to_string())
}

fn default_backtest_config() -> BacktestConfig {
    BacktestConfig {
        start_date: "2023-01-01".to_string(),
        end_date: "2023-12-31".to_string(),
        indicators: vec![BacktestIndicator {
            name: "RSI".to_string(),
            period: 14,
            buy_condition: IndicatorCondition {
                operator: ConditionOperator::LessThan,
                value: 30.0,
            },
            sell_condition: IndicatorCondition {
                operator: ConditionOperator::GreaterThan,
                value: 70.0,
            },
        }],
        strategy_logic: "AND".to_string(),
        rebalance_frequency: "monthly".to_string(),
        seed: None,
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Trading Platform API",
        "version": "1.0.0",
    }))
}

async fn search_stocks(
    Path(query): Path<String>,
    Query(seed): Query<SeedQuery>,
) -> Json<SearchResponse> {
    let needle = query.to_lowercase();
    let mut rng = seed.rng();

    let results = MOCK_STOCKS
        .iter()
        .filter(|s| {
            s.symbol.to_lowercase().contains(&needle) || s.name.to_lowercase().contains(&needle)
        })
        .map(|s| jittered_quote(s, &mut rng))
        .collect();

    Json(SearchResponse { results })
}

async fn get_stock_details(
    Path(symbol): Path<String>,
    Query(seed): Query<SeedQuery>,
) -> Result<Json<StockQuote>, (StatusCode, String)> {
    let record = find_stock(&symbol)
        .ok_or_else(|| engine_error_response(EngineError::UnknownSymbol(symbol.clone())))?;
    Ok(Json(jittered_quote(record, &mut seed.rng())))
}

async fn run_custom_backtest(
    Json(request): Json<BacktestRequest>,
) -> Result<Json<BacktestResult>, (StatusCode, String)> {
    run_portfolio_backtest(&request.portfolio, &request.config, base_price)
        .map(Json)
        .map_err(engine_error_response)
}

async fn run_simple_backtest(
    Json(portfolio): Json<Portfolio>,
) -> Result<Json<LegacyBacktestResponse>, (StatusCode, String)> {
    let result = run_portfolio_backtest(&portfolio, &default_backtest_config(), base_price)
        .map_err(engine_error_response)?;

    Ok(Json(LegacyBacktestResponse {
        final_value: result.final_value,
        total_return: result.total_return,
        total_return_pct: result.total_return_pct,
        sharpe_ratio: result.sharpe_ratio,
        max_drawdown: result.max_drawdown,
        win_rate: result.win_rate,
        total_trades: result.total_trades,
    }))
}

async fn check_alerts(
    Path(symbol): Path<String>,
    Query(seed): Query<SeedQuery>,
) -> Json<serde_json::Value> {
    let mut rng = seed.rng();
    let mut alerts = Vec::new();

    // 5% chance of a signal per poll
    if rng.gen_bool(0.05) {
        let is_buy = rng.gen_bool(0.5);
        let price = base_price(&symbol) * rng.gen_range(0.95..1.05);
        alerts.push(AlertResponse {
            symbol: symbol.to_uppercase(),
            signal_type: if is_buy { "BUY" } else { "SELL" },
            price,
            timestamp: chrono::Utc::now().to_rfc3339(),
            indicators_triggered: if is_buy { vec!["RSI"] } else { vec!["MACD"] },
        });
    }

    Json(serde_json::json!({ "alerts": alerts }))
}

async fn create_notification(
    Query(seed): Query<SeedQuery>,
    Json(notification): Json<NotificationSetup>,
) -> Json<serde_json::Value> {
    let mut rng = seed.rng();
    // Nothing is persisted; acknowledge with a generated id
    Json(serde_json::json!({
        "message": format!("Notification created for {}", notification.symbol),
        "notification_id": rng.gen_range(1000..10000),
    }))
}

async fn get_market_status() -> Json<serde_json::Value> {
    let now = chrono::Local::now();
    let is_weekday = now.weekday().num_days_from_monday() < 5;
    let is_open = is_weekday && (9..16).contains(&now.hour());

    let next_open = if is_open {
        None
    } else {
        let mut date = now.date_naive();
        if now.hour() >= 9 || !is_weekday {
            date = date.succ_opt().unwrap_or(date);
        }
        while date.weekday().num_days_from_monday() >= 5 {
            date = date.succ_opt().unwrap_or(date);
        }
        Some(format!("{date}T09:00:00"))
    };

    Json(serde_json::json!({
        "is_open": is_open,
        "current_time": now.to_rfc3339(),
        "next_open": next_open,
        "session": if is_open { "regular" } else { "closed" },
    }))
}

async fn get_market_movers(Query(seed): Query<SeedQuery>) -> Json<serde_json::Value> {
    let mut rng = seed.rng();

    let mut records: Vec<&'static marketpulse::provider::StockRecord> = MOCK_STOCKS.iter().collect();
    records.shuffle(&mut rng);

    let mut movers: Vec<StockQuote> = records
        .into_iter()
        .take(5)
        .map(|s| jittered_quote(s, &mut rng))
        .collect();

    movers.sort_by(|a, b| {
        b.change_percent
            .abs()
            .partial_cmp(&a.change_percent.abs())
            .unwrap_or(Ordering::Equal)
    });

    Json(serde_json::json!({ "movers": movers }))
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/search/{query}", get(search_stocks))
        .route("/stock/{symbol}", get(get_stock_details))
        .route("/portfolio/backtest", post(run_simple_backtest))
        .route("/portfolio/backtest/custom", post(run_custom_backtest))
        .route("/notifications/check/{symbol}", get(check_alerts))
        .route("/notifications/create", post(create_notification))
        .route("/market/status", get(get_market_status))
        .route("/market/movers", get(get_market_movers))
        .layer(cors);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8001);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Trading platform server on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

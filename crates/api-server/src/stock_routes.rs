//! Raw price history and the popular-stocks list.

use axum::routing::get;
use axum::{
    extract::{Path, Query, State},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use analysis_core::stats::round2;
use analysis_core::{InstrumentDetails, Period};

use crate::{AppError, AppState};

const POPULAR_STOCKS: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("AMZN", "Amazon.com, Inc."),
    ("GOOGL", "Alphabet Inc."),
    ("META", "Meta Platforms, Inc."),
    ("TSLA", "Tesla, Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("JPM", "JPMorgan Chase & Co."),
    ("V", "Visa Inc."),
    ("JNJ", "Johnson & Johnson"),
];

#[derive(Deserialize)]
pub struct TimeframeQuery {
    pub timeframe: Option<String>,
}

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/api/stocks/popular", get(popular_stocks))
        .route("/api/stocks/details/:symbol", get(stock_details))
        .route("/api/stocks/:symbol", get(stock_data))
}

async fn popular_stocks() -> Json<serde_json::Value> {
    let stocks: Vec<_> = POPULAR_STOCKS
        .iter()
        .map(|(symbol, name)| json!({ "symbol": symbol, "name": name }))
        .collect();
    Json(json!(stocks))
}

async fn stock_details(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<InstrumentDetails>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Stock symbol is required".to_string()));
    }

    // Details degrade to canned demo content, never to an error response.
    let details = match state.market.details(&symbol).await {
        Ok(details) => details,
        Err(err) => {
            tracing::warn!(symbol, %err, "stock details fell back to placeholder data");
            placeholder_details(&symbol)
        }
    };
    Ok(Json(details))
}

fn placeholder_details(symbol: &str) -> InstrumentDetails {
    InstrumentDetails {
        symbol: symbol.to_string(),
        name: format!("{} Inc.", symbol),
        logo: String::new(),
        sector: "Technology".to_string(),
        industry: "Software".to_string(),
        description: format!("This is a sample description for {}.", symbol),
        website: format!("https://www.{}.com", symbol.to_lowercase()),
        market_cap: 1_000_000_000.0,
        pe_ratio: 20.5,
        dividend_yield: 1.5,
        fifty_two_week_high: 150.0,
        fifty_two_week_low: 100.0,
        average_volume: 5_000_000,
        beta: 1.2,
    }
}

async fn stock_data(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<TimeframeQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Stock symbol is required".to_string()));
    }

    // Unrecognized timeframes quietly get a month of history.
    let period = query
        .timeframe
        .as_deref()
        .map(|t| Period::from_str(t).unwrap_or(Period::Month1))
        .unwrap_or(Period::Max);

    let bars = state.market.history(&symbol, period).await?;

    // Metadata is cosmetic here; a failed lookup degrades to the bare symbol.
    let meta = state.market.metadata(&symbol).await.ok();
    let (name, sector, industry) = match meta {
        Some(m) => (
            m.display_name,
            m.sector.unwrap_or_default(),
            m.industry.unwrap_or_default(),
        ),
        None => (symbol.clone(), String::new(), String::new()),
    };

    let prices: Vec<_> = bars
        .iter()
        .map(|bar| {
            json!({
                "date": bar.date.format("%Y-%m-%d").to_string(),
                "open": round2(bar.open),
                "high": round2(bar.high),
                "low": round2(bar.low),
                "close": round2(bar.close),
                "volume": bar.volume,
            })
        })
        .collect();

    Ok(Json(json!({
        "symbol": symbol,
        "name": name,
        "sector": sector,
        "industry": industry,
        "prices": prices,
    })))
}

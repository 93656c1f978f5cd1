//! Headlines with aggregate sentiment, by symbol, sector, or the broad
//! market.

use axum::routing::get;
use axum::{
    extract::{Path, Query, State},
    Json, Router,
};
use serde::Deserialize;

use analysis_core::{NewsDigest, NewsTopic};

use crate::{AppError, AppState};

const DEFAULT_COUNT: usize = 5;
const WINDOW_DAYS: i64 = 7;

#[derive(Deserialize)]
pub struct CountQuery {
    pub count: Option<usize>,
}

pub fn news_routes() -> Router<AppState> {
    Router::new()
        .route("/api/news/stock/:symbol", get(stock_news))
        .route("/api/news/sector/:sector", get(sector_news))
        .route("/api/news/market", get(market_news))
}

async fn digest_for(
    state: &AppState,
    topic: NewsTopic,
    count: Option<usize>,
) -> NewsDigest {
    let mut digest = state.news.sentiment(&topic, WINDOW_DAYS).await;
    digest.articles.truncate(count.unwrap_or(DEFAULT_COUNT));
    digest
}

async fn stock_news(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<CountQuery>,
) -> Result<Json<NewsDigest>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Stock symbol is required".to_string()));
    }
    let digest = digest_for(&state, NewsTopic::Symbol(symbol), query.count).await;
    Ok(Json(digest))
}

async fn sector_news(
    State(state): State<AppState>,
    Path(sector): Path<String>,
    Query(query): Query<CountQuery>,
) -> Result<Json<NewsDigest>, AppError> {
    let sector = sector.trim().to_string();
    if sector.is_empty() {
        return Err(AppError::BadRequest("Sector name is required".to_string()));
    }
    let digest = digest_for(&state, NewsTopic::Sector(sector), query.count).await;
    Ok(Json(digest))
}

async fn market_news(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Json<NewsDigest> {
    Json(digest_for(&state, NewsTopic::Market, query.count).await)
}

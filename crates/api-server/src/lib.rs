//! HTTP surface for the causal analysis engine.
//!
//! Thin layer: handlers validate input, call into the engine crates, and
//! serialize results. All heuristics live in `causal-engine`; persistence in
//! `analysis-store`.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use analysis_core::{MarketDataProvider, NewsProvider, RandomSource, ThreadRngSource};
use analysis_store::{AnalysisStore, StoreError};
use causal_engine::{FactorAnalyzer, RecommendationEngine, SectorAnalyzer};
use market_data::{OfflineMarketData, YahooFinanceClient};
use news_feed::NewsApiClient;

pub mod analysis_routes;
pub mod auth;
pub mod auth_routes;
pub mod config;
pub mod news_routes;
pub mod stock_routes;

pub use config::{Config, MarketDataSource};

#[derive(Clone)]
pub struct AppState {
    pub market: Arc<dyn MarketDataProvider>,
    pub news: Arc<dyn NewsProvider>,
    pub analyzer: Arc<FactorAnalyzer>,
    pub recommender: Arc<RecommendationEngine>,
    pub sectors: Arc<SectorAnalyzer>,
    pub store: AnalysisStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = AnalysisStore::connect(&config.database_url).await?;

        let market: Arc<dyn MarketDataProvider> = match config.market_data_source {
            MarketDataSource::Yahoo => Arc::new(YahooFinanceClient::new(config.http_timeout)),
            MarketDataSource::Offline => Arc::new(OfflineMarketData::new()),
        };

        let rng: Arc<dyn RandomSource> = Arc::new(ThreadRngSource);
        let news: Arc<dyn NewsProvider> = Arc::new(NewsApiClient::new(
            config.news_api_key.clone(),
            config.http_timeout,
            rng.clone(),
        ));

        let analyzer = Arc::new(FactorAnalyzer::new(
            market.clone(),
            news.clone(),
            rng,
            config.benchmark.clone(),
        ));
        let recommender = Arc::new(RecommendationEngine::new(market.clone(), analyzer.clone()));
        let sectors = Arc::new(SectorAnalyzer::new(market.clone(), config.benchmark.clone()));

        Ok(Self {
            market,
            news,
            analyzer,
            recommender,
            sectors,
            store,
            config: Arc::new(config),
        })
    }
}

/// Application-level error, mapped to an HTTP status and a JSON body.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    /// Upstream data source failed for an endpoint with no fallback payload.
    Upstream(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({
                "success": false,
                "error": message,
            })),
        )
            .into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Internal(other.into()),
        }
    }
}

impl From<analysis_core::AnalysisError> for AppError {
    fn from(err: analysis_core::AnalysisError) -> Self {
        use analysis_core::AnalysisError;
        match err {
            AnalysisError::InvalidInput(msg) => AppError::BadRequest(msg),
            AnalysisError::NotFound(msg) => AppError::NotFound(msg),
            AnalysisError::DataUnavailable(msg) => AppError::Upstream(msg),
            other => AppError::Internal(other.into()),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(analysis_routes::analysis_routes(state.clone()))
        .merge(stock_routes::stock_routes())
        .merge(news_routes::news_routes())
        .merge(auth_routes::auth_routes(state.clone()))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "api_server=info,causal_engine=info,market_data=info,news_feed=info,tower_http=info"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let addr = config.bind_addr;
    let state = AppState::from_config(config).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "api server listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

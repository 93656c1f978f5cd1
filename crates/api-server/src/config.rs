//! Server configuration, read once from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

/// Which market data backend to wire up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketDataSource {
    /// Live Yahoo Finance chart/quoteSummary endpoints.
    Yahoo,
    /// Deterministic synthetic series, for development without network access.
    Offline,
}

impl MarketDataSource {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "yahoo" => Some(MarketDataSource::Yahoo),
            "offline" => Some(MarketDataSource::Offline),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub market_data_source: MarketDataSource,
    /// NewsAPI key. When absent the news provider serves generated articles.
    pub news_api_key: Option<String>,
    /// Benchmark symbol for market-trend correlation and sector comparison.
    pub benchmark: String,
    pub http_timeout: Duration,
    pub session_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = env_or("PORT", "5001")
            .parse()
            .context("PORT must be a number")?;
        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .context("invalid HOST/PORT")?;

        let market_data_source = match std::env::var("MARKET_DATA_SOURCE") {
            Ok(raw) => MarketDataSource::from_str(&raw)
                .with_context(|| format!("unknown MARKET_DATA_SOURCE {:?}", raw))?,
            Err(_) => MarketDataSource::Yahoo,
        };

        let news_api_key = std::env::var("NEWS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let timeout_secs: u64 = env_or("HTTP_TIMEOUT_SECS", "30")
            .parse()
            .context("HTTP_TIMEOUT_SECS must be a number")?;

        let ttl_hours: i64 = env_or("SESSION_TTL_HOURS", "24")
            .parse()
            .context("SESSION_TTL_HOURS must be a number")?;

        Ok(Self {
            bind_addr,
            database_url: env_or("DATABASE_URL", "sqlite://causalstock.db?mode=rwc"),
            market_data_source,
            news_api_key,
            benchmark: env_or("MARKET_BENCHMARK", "^GSPC"),
            http_timeout: Duration::from_secs(timeout_secs),
            session_ttl: chrono::Duration::hours(ttl_hours),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

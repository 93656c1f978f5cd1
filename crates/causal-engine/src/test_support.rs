//! Stub providers for engine tests.

use analysis_core::{
    AnalysisError, InstrumentMeta, MarketDataProvider, NewsDigest, NewsProvider, NewsTopic,
    Period, PriceBar,
};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use std::collections::HashMap;

/// Market data stub serving fixed per-symbol close series on weekday dates
/// ending today.
pub struct StubMarketData {
    pub series: HashMap<String, Vec<f64>>,
    pub metadata: HashMap<String, InstrumentMeta>,
    pub earnings: HashMap<String, NaiveDate>,
}

impl StubMarketData {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
            metadata: HashMap::new(),
            earnings: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: Vec<f64>) -> Self {
        self.series.insert(symbol.to_string(), closes);
        self
    }

    pub fn with_meta(mut self, symbol: &str, name: &str, sector: Option<&str>) -> Self {
        self.metadata.insert(
            symbol.to_string(),
            InstrumentMeta {
                display_name: name.to_string(),
                sector: sector.map(|s| s.to_string()),
                industry: None,
            },
        );
        self
    }

    pub fn with_earnings(mut self, symbol: &str, date: NaiveDate) -> Self {
        self.earnings.insert(symbol.to_string(), date);
        self
    }
}

/// The last `n` weekdays up to and including today (or the closest prior
/// weekday), ascending.
pub fn trading_dates(n: usize) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n);
    let mut date = Utc::now().date_naive();
    while dates.len() < n {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(date);
        }
        date -= Duration::days(1);
    }
    dates.reverse();
    dates
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    trading_dates(closes.len())
        .into_iter()
        .zip(closes.iter())
        .map(|(date, &close)| PriceBar {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000_000,
        })
        .collect()
}

#[async_trait]
impl MarketDataProvider for StubMarketData {
    async fn history(&self, symbol: &str, _period: Period) -> Result<Vec<PriceBar>, AnalysisError> {
        self.series
            .get(symbol)
            .map(|closes| bars_from_closes(closes))
            .ok_or_else(|| AnalysisError::DataUnavailable(format!("no stub series for {}", symbol)))
    }

    async fn metadata(&self, symbol: &str) -> Result<InstrumentMeta, AnalysisError> {
        self.metadata
            .get(symbol)
            .cloned()
            .ok_or_else(|| AnalysisError::DataUnavailable(format!("no stub meta for {}", symbol)))
    }

    async fn latest_earnings(&self, symbol: &str) -> Result<Option<NaiveDate>, AnalysisError> {
        Ok(self.earnings.get(symbol).copied())
    }
}

/// Market data stub that always fails, for exercising fallback paths.
pub struct FailingMarketData;

#[async_trait]
impl MarketDataProvider for FailingMarketData {
    async fn history(&self, symbol: &str, _period: Period) -> Result<Vec<PriceBar>, AnalysisError> {
        Err(AnalysisError::DataUnavailable(format!("unreachable upstream for {}", symbol)))
    }

    async fn metadata(&self, symbol: &str) -> Result<InstrumentMeta, AnalysisError> {
        Err(AnalysisError::DataUnavailable(format!("unreachable upstream for {}", symbol)))
    }

    async fn latest_earnings(&self, _symbol: &str) -> Result<Option<NaiveDate>, AnalysisError> {
        Err(AnalysisError::DataUnavailable("unreachable upstream".to_string()))
    }
}

/// News stub with a fixed sentiment score and no articles.
pub struct StubNews {
    pub sentiment: f64,
}

#[async_trait]
impl NewsProvider for StubNews {
    async fn sentiment(&self, _topic: &NewsTopic, _window_days: i64) -> NewsDigest {
        NewsDigest {
            articles: Vec::new(),
            sentiment: self.sentiment,
        }
    }
}

use crate::{
    AnalysisError, InstrumentDetails, InstrumentMeta, NewsDigest, NewsTopic, Period, PriceBar,
};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Source of historical bars and instrument metadata.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `symbol` over `period`, ascending by date.
    async fn history(&self, symbol: &str, period: Period) -> Result<Vec<PriceBar>, AnalysisError>;

    async fn metadata(&self, symbol: &str) -> Result<InstrumentMeta, AnalysisError>;

    /// The most recent known earnings date, if the provider has one.
    async fn latest_earnings(&self, symbol: &str) -> Result<Option<NaiveDate>, AnalysisError>;

    /// Extended company profile. Not every source carries one; the default
    /// reports it unavailable and the HTTP layer serves its placeholder.
    async fn details(&self, symbol: &str) -> Result<InstrumentDetails, AnalysisError> {
        Err(AnalysisError::DataUnavailable(format!(
            "no detailed profile source for {}",
            symbol
        )))
    }
}

/// Source of recent articles plus an aggregate sentiment score.
///
/// Implementations must degrade to mock content rather than fail: a news
/// outage never blocks an analysis.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn sentiment(&self, topic: &NewsTopic, window_days: i64) -> NewsDigest;
}

use analysis_core::{
    AnalysisError, InstrumentDetails, InstrumentMeta, MarketDataProvider, Period, PriceBar,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub mod offline;
pub use offline::OfflineMarketData;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_BASE_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; causalstock/0.1)";

/// Market data provider backed by Yahoo Finance's public chart and
/// quote-summary endpoints. One bounded-latency attempt per call; any
/// network, HTTP or parse failure maps to `DataUnavailable` and the caller's
/// documented fallback takes over.
#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    async fn fetch_chart(&self, symbol: &str, period: Period) -> Result<ChartResult, AnalysisError> {
        let url = format!("{}/{}", CHART_BASE_URL, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(symbol, error = %e, "chart request failed");
                AnalysisError::DataUnavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            tracing::warn!(symbol, status = %response.status(), "chart request rejected");
            return Err(AnalysisError::DataUnavailable(format!(
                "chart HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::DataUnavailable(e.to_string()))?;

        body.chart
            .result
            .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
            .ok_or_else(|| AnalysisError::DataUnavailable(format!("no chart data for {}", symbol)))
    }

    async fn fetch_summary(
        &self,
        symbol: &str,
        modules: &str,
    ) -> Result<SummaryResult, AnalysisError> {
        let url = format!("{}/{}", SUMMARY_BASE_URL, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("modules", modules)])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(symbol, error = %e, "quoteSummary request failed");
                AnalysisError::DataUnavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            tracing::warn!(symbol, status = %response.status(), "quoteSummary request rejected");
            return Err(AnalysisError::DataUnavailable(format!(
                "quoteSummary HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let body: SummaryResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::DataUnavailable(e.to_string()))?;

        body.quote_summary
            .result
            .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
            .ok_or_else(|| {
                AnalysisError::DataUnavailable(format!("no summary data for {}", symbol))
            })
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn history(&self, symbol: &str, period: Period) -> Result<Vec<PriceBar>, AnalysisError> {
        let chart = self.fetch_chart(symbol, period).await?;

        let quote = chart
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::DataUnavailable(format!("no quotes for {}", symbol)))?;

        // Yahoo pads halted days with nulls; rows missing a close are skipped.
        let mut bars = Vec::with_capacity(chart.timestamp.len());
        for (i, ts) in chart.timestamp.iter().enumerate() {
            let close = match quote.close.get(i).copied().flatten() {
                Some(c) => c,
                None => continue,
            };
            let date = match DateTime::from_timestamp(*ts, 0) {
                Some(dt) => dt.date_naive(),
                None => continue,
            };
            bars.push(PriceBar {
                date,
                open: quote.open.get(i).copied().flatten().unwrap_or(close),
                high: quote.high.get(i).copied().flatten().unwrap_or(close),
                low: quote.low.get(i).copied().flatten().unwrap_or(close),
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        if bars.is_empty() {
            return Err(AnalysisError::DataUnavailable(format!(
                "empty price history for {}",
                symbol
            )));
        }

        Ok(bars)
    }

    async fn metadata(&self, symbol: &str) -> Result<InstrumentMeta, AnalysisError> {
        let summary = self.fetch_summary(symbol, "assetProfile,price").await?;

        let display_name = summary
            .price
            .as_ref()
            .and_then(|p| p.short_name.clone().or_else(|| p.long_name.clone()))
            .unwrap_or_else(|| symbol.to_string());

        let (sector, industry) = match summary.asset_profile {
            Some(profile) => (profile.sector, profile.industry),
            None => (None, None),
        };

        Ok(InstrumentMeta {
            display_name,
            sector,
            industry,
        })
    }

    async fn details(&self, symbol: &str) -> Result<InstrumentDetails, AnalysisError> {
        let summary = self
            .fetch_summary(
                symbol,
                "assetProfile,price,summaryDetail,defaultKeyStatistics",
            )
            .await?;

        let name = summary
            .price
            .as_ref()
            .and_then(|p| p.short_name.clone().or_else(|| p.long_name.clone()))
            .unwrap_or_else(|| symbol.to_string());
        let market_cap = summary
            .price
            .as_ref()
            .and_then(|p| p.market_cap.as_ref())
            .and_then(|v| v.raw)
            .unwrap_or(0.0);

        let (sector, industry, description, website) = match summary.asset_profile {
            Some(p) => (
                p.sector.unwrap_or_default(),
                p.industry.unwrap_or_default(),
                p.long_business_summary.unwrap_or_default(),
                p.website.unwrap_or_default(),
            ),
            None => Default::default(),
        };

        let detail = summary.summary_detail.unwrap_or_default();
        let beta = detail
            .beta
            .as_ref()
            .and_then(|v| v.raw)
            .or_else(|| {
                summary
                    .key_statistics
                    .and_then(|k| k.beta)
                    .and_then(|v| v.raw)
            })
            .unwrap_or(0.0);

        Ok(InstrumentDetails {
            symbol: symbol.to_string(),
            name,
            logo: String::new(),
            sector,
            industry,
            description,
            website,
            market_cap,
            pe_ratio: detail.trailing_pe.and_then(|v| v.raw).unwrap_or(0.0),
            // Yahoo reports the yield as a fraction; the wire carries percent.
            dividend_yield: detail.dividend_yield.and_then(|v| v.raw).unwrap_or(0.0) * 100.0,
            fifty_two_week_high: detail.fifty_two_week_high.and_then(|v| v.raw).unwrap_or(0.0),
            fifty_two_week_low: detail.fifty_two_week_low.and_then(|v| v.raw).unwrap_or(0.0),
            average_volume: detail.average_volume.and_then(|v| v.raw).unwrap_or(0),
            beta,
        })
    }

    async fn latest_earnings(&self, symbol: &str) -> Result<Option<NaiveDate>, AnalysisError> {
        let summary = self.fetch_summary(symbol, "calendarEvents").await?;

        let today = Utc::now().date_naive();
        let latest = summary
            .calendar_events
            .and_then(|c| c.earnings)
            .map(|e| e.earnings_date)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|entry| entry.raw)
            .filter_map(|epoch| DateTime::from_timestamp(epoch, 0))
            .map(|dt| dt.date_naive())
            .filter(|date| *date <= today)
            .max();

        Ok(latest)
    }
}

// --- Yahoo wire types ---

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<SummaryResult>>,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
    #[serde(rename = "calendarEvents")]
    calendar_events: Option<CalendarEvents>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Deserialize)]
struct AssetProfile {
    sector: Option<String>,
    industry: Option<String>,
    #[serde(rename = "longBusinessSummary")]
    long_business_summary: Option<String>,
    website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawFloat>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawFloat>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawFloat>,
    #[serde(rename = "fiftyTwoWeekHigh")]
    fifty_two_week_high: Option<RawFloat>,
    #[serde(rename = "fiftyTwoWeekLow")]
    fifty_two_week_low: Option<RawFloat>,
    #[serde(rename = "averageVolume")]
    average_volume: Option<RawValue>,
    beta: Option<RawFloat>,
}

#[derive(Debug, Deserialize)]
struct KeyStatistics {
    beta: Option<RawFloat>,
}

#[derive(Debug, Deserialize)]
struct RawFloat {
    raw: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CalendarEvents {
    earnings: Option<EarningsCalendar>,
}

#[derive(Debug, Deserialize)]
struct EarningsCalendar {
    #[serde(rename = "earningsDate", default)]
    earnings_date: Vec<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<i64>,
}

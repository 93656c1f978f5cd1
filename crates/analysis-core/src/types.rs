use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar. Series are ordered ascending by date, one bar per
/// trading day, and immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Instrument metadata as reported by the market data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentMeta {
    pub display_name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

/// Extended company profile for the stock-details endpoint. Absent upstream
/// figures are zeroed, never omitted, so the wire shape is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentDetails {
    pub symbol: String,
    pub name: String,
    pub logo: String,
    pub sector: String,
    pub industry: String,
    pub description: String,
    pub website: String,
    pub market_cap: f64,
    pub pe_ratio: f64,
    /// Percent, not fraction.
    pub dividend_yield: f64,
    pub fifty_two_week_high: f64,
    pub fifty_two_week_low: f64,
    pub average_volume: i64,
    pub beta: f64,
}

/// Supported history lookback windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Day1,
    Day5,
    Month1,
    Month3,
    Month6,
    Year1,
    Year2,
    Year5,
    Max,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day1 => "1d",
            Period::Day5 => "5d",
            Period::Month1 => "1mo",
            Period::Month3 => "3mo",
            Period::Month6 => "6mo",
            Period::Year1 => "1y",
            Period::Year2 => "2y",
            Period::Year5 => "5y",
            Period::Max => "max",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(Period::Day1),
            "5d" => Some(Period::Day5),
            "1mo" => Some(Period::Month1),
            "3mo" => Some(Period::Month3),
            "6mo" => Some(Period::Month6),
            "1y" => Some(Period::Year1),
            "2y" => Some(Period::Year2),
            "5y" => Some(Period::Year5),
            "max" => Some(Period::Max),
            _ => None,
        }
    }

    /// Approximate calendar days covered by the period, for providers that
    /// take explicit date ranges.
    pub fn approx_days(&self) -> i64 {
        match self {
            Period::Day1 => 1,
            Period::Day5 => 5,
            Period::Month1 => 30,
            Period::Month3 => 91,
            Period::Month6 => 182,
            Period::Year1 => 365,
            Period::Year2 => 730,
            Period::Year5 => 1825,
            Period::Max => 7300,
        }
    }
}

/// The fixed set of causal factor kinds, in their emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactorKind {
    MarketTrend,
    Volatility,
    EarningsReport,
    SectorPerformance,
    NewsSentiment,
    AnalystRatings,
}

impl FactorKind {
    pub fn to_label(&self) -> &'static str {
        match self {
            FactorKind::MarketTrend => "Market Trend",
            FactorKind::Volatility => "Volatility",
            FactorKind::EarningsReport => "Earnings Report",
            FactorKind::SectorPerformance => "Sector Performance",
            FactorKind::NewsSentiment => "News Sentiment",
            FactorKind::AnalystRatings => "Analyst Ratings",
        }
    }
}

/// A named, signed contribution attributed to price movement.
/// `impact` lies in [-1.0, 1.0]; the sign is direction, the magnitude is
/// conviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CausalFactor {
    pub kind: FactorKind,
    pub name: String,
    pub impact: f64,
    pub description: String,
}

impl CausalFactor {
    pub fn new(kind: FactorKind, impact: f64, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: kind.to_label().to_string(),
            impact,
            description: description.into(),
        }
    }
}

/// News/social/overall sentiment, each in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub news: f64,
    pub social: f64,
    pub overall: f64,
}

/// Full causal analysis for one symbol. Computed fresh per request and never
/// cached or shared across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CausalAnalysis {
    pub symbol: String,
    pub name: String,
    pub factors: Vec<CausalFactor>,
    pub sentiment: SentimentSummary,
}

/// Buy/hold/sell call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advice {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "SELL")]
    Sell,
}

impl Advice {
    pub fn to_label(&self) -> &'static str {
        match self {
            Advice::Buy => "BUY",
            Advice::Hold => "HOLD",
            Advice::Sell => "SELL",
        }
    }
}

/// Low/median/high price band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTarget {
    pub low: f64,
    pub median: f64,
    pub high: f64,
}

/// Investment recommendation derived from exactly one CausalAnalysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub symbol: String,
    pub name: String,
    pub recommendation: Advice,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(rename = "priceTarget")]
    pub price_target: PriceTarget,
    #[serde(rename = "timeHorizon")]
    pub time_horizon: String,
}

/// Sector outlook relative to the market benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorOutlook {
    StrongOutperform,
    SlightOutperform,
    Comparable,
    Underperform,
}

impl SectorOutlook {
    pub fn to_label(&self) -> &'static str {
        match self {
            SectorOutlook::StrongOutperform => {
                "Strong outperformance compared to the overall market"
            }
            SectorOutlook::SlightOutperform => {
                "Slight outperformance compared to the overall market"
            }
            SectorOutlook::Comparable => "Comparable performance to the overall market",
            SectorOutlook::Underperform => "Underperformance compared to the overall market",
        }
    }
}

impl serde::Serialize for SectorOutlook {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_label())
    }
}

/// One entry in a sector report's illustrative top-instruments list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorInstrument {
    pub symbol: String,
    pub name: String,
    pub performance: f64,
    pub recommendation: Advice,
}

/// Sector-level relative performance vs. the market benchmark.
#[derive(Debug, Clone, Serialize)]
pub struct SectorReport {
    pub sector: String,
    pub etf: String,
    pub performance: f64,
    pub volatility: f64,
    #[serde(rename = "marketPerformance")]
    pub market_performance: f64,
    #[serde(rename = "relativePerformance")]
    pub relative_performance: f64,
    pub outlook: SectorOutlook,
    #[serde(rename = "topStocks")]
    pub top_instruments: Vec<SectorInstrument>,
}

/// A news article returned by the news provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub source: String,
    pub url: String,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
    pub summary: String,
}

/// Articles plus an aggregate sentiment score in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDigest {
    pub articles: Vec<NewsArticle>,
    pub sentiment: f64,
}

/// What the news provider is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsTopic {
    Symbol(String),
    Sector(String),
    Market,
}

/// A user's persisted analysis. Owned by the store; the engines only ever
/// see it through the store interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAnalysis {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub recommendation: String,
    pub notes: String,
    pub factors: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

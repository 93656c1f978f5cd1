use analysis_core::stats::{annualized_volatility, daily_returns, pearson, round2};
use analysis_core::{
    AnalysisError, CausalAnalysis, CausalFactor, FactorKind, MarketDataProvider, NewsProvider,
    NewsTopic, Period, PriceBar, RandomSource, SentimentSummary,
};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::fallback;

#[cfg(test)]
#[path = "analyzer_tests.rs"]
mod analyzer_tests;

/// Days after an earnings report during which the earnings factor is emitted.
const EARNINGS_WINDOW_DAYS: i64 = 30;
/// Lookback for the news sentiment factor.
const NEWS_WINDOW_DAYS: i64 = 7;

/// Synthesizes the causal factor set for one symbol from six months of price
/// history, benchmark correlation, earnings proximity and news sentiment.
pub struct FactorAnalyzer {
    market: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    rng: Arc<dyn RandomSource>,
    benchmark: String,
}

impl FactorAnalyzer {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
        rng: Arc<dyn RandomSource>,
        benchmark: impl Into<String>,
    ) -> Self {
        Self {
            market,
            news,
            rng,
            benchmark: benchmark.into(),
        }
    }

    /// Analyze a symbol. Infallible: if price history for the symbol or the
    /// benchmark cannot be fetched, the documented placeholder analysis is
    /// returned instead.
    pub async fn analyze(&self, symbol: &str) -> CausalAnalysis {
        match self.analyze_live(symbol).await {
            Ok(analysis) => analysis,
            Err(err) => {
                tracing::warn!(symbol, %err, "factor analysis fell back to placeholder data");
                fallback::placeholder_analysis(symbol)
            }
        }
    }

    async fn analyze_live(&self, symbol: &str) -> Result<CausalAnalysis, AnalysisError> {
        let bars = self.market.history(symbol, Period::Month6).await?;
        let benchmark_bars = self.market.history(&self.benchmark, Period::Month6).await?;

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let returns = daily_returns(&closes);
        let volatility = annualized_volatility(&returns);
        let correlation = correlation_by_date(&bars, &benchmark_bars);

        // Metadata failures only cost the display name and the sector
        // factor, not the whole analysis.
        let meta = self.market.metadata(symbol).await.ok();
        let name = meta
            .as_ref()
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| symbol.to_string());
        let sector = meta.and_then(|m| m.sector).filter(|s| !s.is_empty());

        let mut factors = Vec::with_capacity(6);

        factors.push(CausalFactor::new(
            FactorKind::MarketTrend,
            round2(correlation * 0.8),
            format!(
                "Stock has a {:.2} correlation with the overall market",
                correlation.abs()
            ),
        ));

        let vol_weight = if volatility > 0.2 { 0.5 } else { 0.8 };
        factors.push(CausalFactor::new(
            FactorKind::Volatility,
            round2((volatility * 2.0).min(1.0) * vol_weight),
            format!("Stock has {:.2} annualized volatility", volatility),
        ));

        if let Some(factor) = self.earnings_factor(symbol, &closes).await {
            factors.push(factor);
        }

        if let Some(sector) = sector {
            let impact = round2(self.bimodal_impact(0.5));
            factors.push(CausalFactor::new(
                FactorKind::SectorPerformance,
                impact,
                format!(
                    "{} sector is showing {} performance",
                    sector,
                    if impact > 0.0 { "strong" } else { "weak" }
                ),
            ));
        }

        let digest = self
            .news
            .sentiment(&NewsTopic::Symbol(symbol.to_string()), NEWS_WINDOW_DAYS)
            .await;
        let news_sentiment = digest.sentiment;
        factors.push(CausalFactor::new(
            FactorKind::NewsSentiment,
            round2((news_sentiment - 0.5) * 1.6),
            format!(
                "Recent news sentiment is {}",
                if news_sentiment > 0.5 {
                    "positive"
                } else if news_sentiment < 0.5 {
                    "negative"
                } else {
                    "neutral"
                }
            ),
        ));

        // No live analyst-rating source is integrated; placeholder signal
        // with a positive lean, same as the sector factor.
        let analyst_impact = round2(self.bimodal_impact(0.4));
        factors.push(CausalFactor::new(
            FactorKind::AnalystRatings,
            analyst_impact,
            format!(
                "Recent analyst ratings are generally {}",
                if analyst_impact > 0.0 { "positive" } else { "negative" }
            ),
        ));

        let social = round2(self.rng.range(0.4, 0.7));
        Ok(CausalAnalysis {
            symbol: symbol.to_string(),
            name,
            factors,
            sentiment: SentimentSummary {
                news: round2(news_sentiment),
                social,
                overall: round2(news_sentiment * 0.6 + social * 0.4),
            },
        })
    }

    /// Emitted only when the latest known earnings date falls inside the
    /// 30-day window. Compares the latest close against the close from
    /// `days_since + 5` bars back, clamped to the series bounds.
    async fn earnings_factor(&self, symbol: &str, closes: &[f64]) -> Option<CausalFactor> {
        if closes.len() < 2 {
            return None;
        }

        let earnings_date = self.market.latest_earnings(symbol).await.ok().flatten()?;
        let days_since = days_since(earnings_date);
        if !(0..EARNINGS_WINDOW_DAYS).contains(&days_since) {
            return None;
        }

        let len = closes.len();
        let lookback = ((days_since + 5) as usize).min(len - 1);
        let last = closes[len - 1];
        let pre = if lookback == 0 { closes[0] } else { closes[len - lookback] };
        if pre == 0.0 {
            return None;
        }
        let change = (last - pre) / pre;

        let direction = if change > 0.0 { 0.9 } else { -0.9 };
        Some(CausalFactor::new(
            FactorKind::EarningsReport,
            round2((change.abs() * 2.0).min(1.0) * direction),
            format!(
                "Recent earnings report {} expectations",
                if change > 0.0 { "exceeded" } else { "missed" }
            ),
        ))
    }

    /// Random magnitude in [0.3, 0.7], sign positive with probability
    /// `1 - negative_cutoff`. Placeholder signal with no real upstream.
    fn bimodal_impact(&self, negative_cutoff: f64) -> f64 {
        let magnitude = self.rng.range(0.3, 0.7);
        if self.rng.next_f64() > negative_cutoff {
            magnitude
        } else {
            -magnitude
        }
    }
}

fn days_since(date: NaiveDate) -> i64 {
    (Utc::now().date_naive() - date).num_days()
}

/// Pearson correlation of daily returns, paired by trading date so that
/// holidays or missing bars in one series do not misalign the other.
fn correlation_by_date(bars: &[PriceBar], benchmark: &[PriceBar]) -> f64 {
    let benchmark_returns: HashMap<NaiveDate, f64> = benchmark
        .windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].date, (w[1].close - w[0].close) / w[0].close))
        .collect();

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for w in bars.windows(2) {
        if w[0].close == 0.0 {
            continue;
        }
        if let Some(benchmark_return) = benchmark_returns.get(&w[1].date) {
            xs.push((w[1].close - w[0].close) / w[0].close);
            ys.push(*benchmark_return);
        }
    }

    pearson(&xs, &ys)
}

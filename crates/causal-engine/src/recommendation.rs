use analysis_core::stats::{annualized_volatility, daily_returns, mean, round2};
use analysis_core::{
    Advice, AnalysisError, CausalAnalysis, CausalFactor, MarketDataProvider, Period, PriceTarget,
    Recommendation,
};
use std::sync::Arc;

use crate::fallback;
use crate::FactorAnalyzer;

#[cfg(test)]
#[path = "recommendation_tests.rs"]
mod recommendation_tests;

const TIME_HORIZON: &str = "Medium-term (3-6 months)";

/// Aggregates factor impacts into a buy/hold/sell call with a confidence
/// score, templated reasoning and a volatility-derived price band.
pub struct RecommendationEngine {
    market: Arc<dyn MarketDataProvider>,
    analyzer: Arc<FactorAnalyzer>,
}

impl RecommendationEngine {
    pub fn new(market: Arc<dyn MarketDataProvider>, analyzer: Arc<FactorAnalyzer>) -> Self {
        Self { market, analyzer }
    }

    /// Recommend for a symbol. Runs the factor analyzer first unless the
    /// caller already has an analysis in hand.
    pub async fn recommend(
        &self,
        symbol: &str,
        analysis: Option<CausalAnalysis>,
    ) -> Result<Recommendation, AnalysisError> {
        let analysis = match analysis {
            Some(a) => a,
            None => self.analyzer.analyze(symbol).await,
        };

        if analysis.factors.is_empty() {
            // The analyzer guarantees at least two factors; an empty list is
            // a defect, not a user error.
            return Err(AnalysisError::InvariantViolation(format!(
                "causal analysis for {} carries no factors",
                symbol
            )));
        }

        let impacts: Vec<f64> = analysis.factors.iter().map(|f| f.impact).collect();
        let overall = mean(&impacts);
        let (advice, confidence) = decide(overall);
        let reasoning = build_reasoning(advice, &analysis.factors);
        let price_target = self.price_target(symbol, overall).await;

        Ok(Recommendation {
            symbol: symbol.to_string(),
            name: analysis.name,
            recommendation: advice,
            confidence: round2(confidence),
            reasoning,
            price_target,
            time_horizon: TIME_HORIZON.to_string(),
        })
    }

    /// Band around the latest close, scaled by one month of annualized
    /// volatility. A fetch failure degrades to the fixed placeholder band.
    async fn price_target(&self, symbol: &str, overall: f64) -> PriceTarget {
        let bars = match self.market.history(symbol, Period::Month1).await {
            Ok(bars) if !bars.is_empty() => bars,
            Ok(_) => {
                tracing::warn!(symbol, "empty 1mo history, price target fell back to placeholder");
                return fallback::placeholder_price_target();
            }
            Err(err) => {
                tracing::warn!(symbol, %err, "price target fell back to placeholder band");
                return fallback::placeholder_price_target();
            }
        };

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let current = closes[closes.len() - 1];
        let volatility = annualized_volatility(&daily_returns(&closes));

        PriceTarget {
            low: round2(current * (1.0 - volatility * 1.5)),
            median: round2(current * (1.0 + overall * 0.2)),
            high: round2(current * (1.0 + volatility * 1.5)),
        }
    }
}

/// Threshold decision over the mean factor impact. Confidence is left
/// unrounded and unclamped for HOLD (a dead-neutral analysis reads as full
/// confidence 1.0).
pub(crate) fn decide(overall: f64) -> (Advice, f64) {
    if overall > 0.3 {
        (Advice::Buy, (0.5 + overall).min(0.95))
    } else if overall < -0.3 {
        (Advice::Sell, (0.5 + overall.abs()).min(0.95))
    } else {
        (Advice::Hold, 0.5 + (0.5 - overall.abs()))
    }
}

pub(crate) fn build_reasoning(advice: Advice, factors: &[CausalFactor]) -> String {
    let mut reasoning = match advice {
        Advice::Buy => {
            "Based on positive market conditions, favorable news sentiment, and strong analyst ratings."
        }
        Advice::Sell => {
            "Based on negative market conditions, unfavorable news sentiment, and weak analyst ratings."
        }
        Advice::Hold => "Based on mixed signals and moderate market conditions.",
    }
    .to_string();

    let positive: Vec<&str> = factors
        .iter()
        .filter(|f| f.impact > 0.4)
        .map(|f| f.name.as_str())
        .collect();
    let negative: Vec<&str> = factors
        .iter()
        .filter(|f| f.impact < -0.4)
        .map(|f| f.name.as_str())
        .collect();

    if !positive.is_empty() {
        reasoning.push_str(&format!(" Positive factors include {}.", positive.join(", ")));
    }
    if !negative.is_empty() {
        reasoning.push_str(&format!(" Negative factors include {}.", negative.join(", ")));
    }

    reasoning
}

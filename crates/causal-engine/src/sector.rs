use analysis_core::stats::{annualized_volatility, daily_returns, round2};
use analysis_core::{MarketDataProvider, Period, SectorOutlook, SectorReport};
use std::sync::Arc;

use crate::fallback;

/// Case-insensitive sector name to benchmark ETF. Unknown sectors fall back
/// to the broad-market SPY.
const SECTOR_ETFS: &[(&str, &str)] = &[
    ("technology", "XLK"),
    ("healthcare", "XLV"),
    ("financials", "XLF"),
    ("energy", "XLE"),
    ("consumer", "XLY"),
    ("utilities", "XLU"),
    ("materials", "XLB"),
    ("industrials", "XLI"),
    ("real-estate", "XLRE"),
    ("communication", "XLC"),
];

const DEFAULT_ETF: &str = "SPY";

/// Sector-level relative performance against the market benchmark.
pub struct SectorAnalyzer {
    market: Arc<dyn MarketDataProvider>,
    benchmark: String,
}

impl SectorAnalyzer {
    pub fn new(market: Arc<dyn MarketDataProvider>, benchmark: impl Into<String>) -> Self {
        Self {
            market,
            benchmark: benchmark.into(),
        }
    }

    pub fn etf_for(sector: &str) -> &'static str {
        let lower = sector.to_lowercase();
        SECTOR_ETFS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, etf)| *etf)
            .unwrap_or(DEFAULT_ETF)
    }

    /// Analyze a sector. Infallible: any fetch failure degrades to the fixed
    /// placeholder report.
    pub async fn analyze_sector(&self, sector: &str) -> SectorReport {
        let etf = Self::etf_for(sector);
        let display = capitalize(sector);

        match self.analyze_live(&display, etf).await {
            Ok(report) => report,
            Err(err) => {
                tracing::warn!(sector, etf, %err, "sector analysis fell back to placeholder data");
                fallback::placeholder_sector_report(display, etf.to_string())
            }
        }
    }

    async fn analyze_live(
        &self,
        display: &str,
        etf: &str,
    ) -> Result<SectorReport, analysis_core::AnalysisError> {
        let sector_bars = self.market.history(etf, Period::Month6).await?;
        let market_bars = self.market.history(&self.benchmark, Period::Month6).await?;

        let sector_closes: Vec<f64> = sector_bars.iter().map(|b| b.close).collect();
        let market_closes: Vec<f64> = market_bars.iter().map(|b| b.close).collect();
        if sector_closes.len() < 2 || market_closes.len() < 2 {
            return Err(analysis_core::AnalysisError::DataUnavailable(
                "history too short for sector analysis".to_string(),
            ));
        }

        let performance = period_performance(&sector_closes);
        let market_performance = period_performance(&market_closes);
        let relative = performance - market_performance;
        let volatility = annualized_volatility(&daily_returns(&sector_closes));

        Ok(SectorReport {
            sector: display.to_string(),
            etf: etf.to_string(),
            performance: round2(performance),
            volatility: round2(volatility),
            market_performance: round2(market_performance),
            relative_performance: round2(relative),
            outlook: outlook_for(relative),
            top_instruments: fallback::top_instruments(),
        })
    }
}

/// First-to-last close change in percent.
fn period_performance(closes: &[f64]) -> f64 {
    (closes[closes.len() - 1] - closes[0]) / closes[0] * 100.0
}

/// Strict thresholds: exactly +5 is only a slight outperform, exactly 0 is
/// comparable, exactly -5 is an underperform.
pub(crate) fn outlook_for(relative_performance: f64) -> SectorOutlook {
    if relative_performance > 5.0 {
        SectorOutlook::StrongOutperform
    } else if relative_performance > 0.0 {
        SectorOutlook::SlightOutperform
    } else if relative_performance > -5.0 {
        SectorOutlook::Comparable
    } else {
        SectorOutlook::Underperform
    }
}

/// First letter upper, the rest lower, matching the original API's sector
/// labels ("TECHNOLOGY" -> "Technology").
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

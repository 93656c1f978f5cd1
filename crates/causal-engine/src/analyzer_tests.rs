use super::*;
use crate::test_support::{FailingMarketData, StubMarketData, StubNews};
use analysis_core::SeededSource;
use chrono::Duration;

const BENCHMARK: &str = "^GSPC";

/// Six months of alternating +1%/-1% closes.
fn alternating_closes(start: f64, n: usize) -> Vec<f64> {
    let mut closes = Vec::with_capacity(n);
    let mut price = start;
    for i in 0..n {
        closes.push(price);
        price *= if i % 2 == 0 { 1.01 } else { 0.99 };
    }
    closes
}

fn analyzer_for(market: StubMarketData, news_sentiment: f64, seed: u64) -> FactorAnalyzer {
    FactorAnalyzer::new(
        Arc::new(market),
        Arc::new(StubNews {
            sentiment: news_sentiment,
        }),
        Arc::new(SeededSource::new(seed)),
        BENCHMARK,
    )
}

#[tokio::test]
async fn test_full_factor_set_in_fixed_order() {
    let benchmark = alternating_closes(4000.0, 126);
    // Same return series as the benchmark, so correlation is exactly 1.
    let symbol: Vec<f64> = benchmark.iter().map(|c| c / 10.0).collect();

    let market = StubMarketData::new()
        .with_closes("AAPL", symbol.clone())
        .with_closes(BENCHMARK, benchmark)
        .with_meta("AAPL", "Apple Inc.", Some("Technology"))
        .with_earnings("AAPL", Utc::now().date_naive() - Duration::days(10));

    let analysis = analyzer_for(market, 0.7, 42).analyze("AAPL").await;

    assert_eq!(analysis.symbol, "AAPL");
    assert_eq!(analysis.name, "Apple Inc.");

    let kinds: Vec<FactorKind> = analysis.factors.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FactorKind::MarketTrend,
            FactorKind::Volatility,
            FactorKind::EarningsReport,
            FactorKind::SectorPerformance,
            FactorKind::NewsSentiment,
            FactorKind::AnalystRatings,
        ]
    );

    for factor in &analysis.factors {
        assert!(
            (-1.0..=1.0).contains(&factor.impact),
            "impact out of range: {:?}",
            factor
        );
    }

    // Correlation 1.0 -> 0.8 exactly.
    assert_eq!(analysis.factors[0].impact, 0.8);

    // Volatility impact follows the documented weighting of the annualized
    // stdev of the symbol's own returns.
    let returns = daily_returns(&symbol);
    let vol = annualized_volatility(&returns);
    let weight = if vol > 0.2 { 0.5 } else { 0.8 };
    assert_eq!(
        analysis.factors[1].impact,
        round2((vol * 2.0).min(1.0) * weight)
    );

    // Earnings 10 days ago compares against the close 15 bars back.
    let len = symbol.len();
    let change = (symbol[len - 1] - symbol[len - 15]) / symbol[len - 15];
    let direction = if change > 0.0 { 0.9 } else { -0.9 };
    assert_eq!(
        analysis.factors[2].impact,
        round2((change.abs() * 2.0).min(1.0) * direction)
    );

    // Sentiment 0.7 -> (0.7 - 0.5) * 1.6 = 0.32.
    assert_eq!(analysis.factors[4].impact, 0.32);
    assert!(analysis.factors[4].description.contains("positive"));

    // Placeholder factors stay in their bimodal band.
    for idx in [3, 5] {
        let magnitude = analysis.factors[idx].impact.abs();
        assert!((0.3..=0.7).contains(&magnitude));
    }

    assert_eq!(analysis.sentiment.news, 0.7);
    assert!((0.4..=0.7).contains(&analysis.sentiment.social));
    assert_eq!(
        analysis.sentiment.overall,
        round2(0.7 * 0.6 + analysis.sentiment.social * 0.4)
    );
}

#[tokio::test]
async fn test_conditional_factors_absent() {
    let benchmark = alternating_closes(4000.0, 126);
    let symbol = alternating_closes(150.0, 126);

    // No sector metadata, earnings 40 days out of the window.
    let market = StubMarketData::new()
        .with_closes("XYZ", symbol)
        .with_closes(BENCHMARK, benchmark)
        .with_meta("XYZ", "Xyz Corp", None)
        .with_earnings("XYZ", Utc::now().date_naive() - Duration::days(40));

    let analysis = analyzer_for(market, 0.5, 1).analyze("XYZ").await;

    let kinds: Vec<FactorKind> = analysis.factors.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FactorKind::MarketTrend,
            FactorKind::Volatility,
            FactorKind::NewsSentiment,
            FactorKind::AnalystRatings,
        ]
    );

    // Neutral sentiment scores a zero-impact news factor.
    assert_eq!(analysis.factors[2].impact, 0.0);
    assert!(analysis.factors[2].description.contains("neutral"));
}

#[tokio::test]
async fn test_earnings_window_boundary() {
    let benchmark = alternating_closes(4000.0, 126);
    let symbol = alternating_closes(80.0, 126);
    let today = Utc::now().date_naive();

    let inside = StubMarketData::new()
        .with_closes("A", symbol.clone())
        .with_closes(BENCHMARK, benchmark.clone())
        .with_earnings("A", today - Duration::days(29));
    let analysis = analyzer_for(inside, 0.5, 2).analyze("A").await;
    assert!(analysis
        .factors
        .iter()
        .any(|f| f.kind == FactorKind::EarningsReport));

    let outside = StubMarketData::new()
        .with_closes("A", symbol)
        .with_closes(BENCHMARK, benchmark)
        .with_earnings("A", today - Duration::days(30));
    let analysis = analyzer_for(outside, 0.5, 2).analyze("A").await;
    assert!(!analysis
        .factors
        .iter()
        .any(|f| f.kind == FactorKind::EarningsReport));
}

#[tokio::test]
async fn test_fallback_on_data_unavailable() {
    let analyzer = FactorAnalyzer::new(
        Arc::new(FailingMarketData),
        Arc::new(StubNews { sentiment: 0.5 }),
        Arc::new(SeededSource::new(3)),
        BENCHMARK,
    );

    let analysis = analyzer.analyze("ZZZZ").await;

    assert_eq!(analysis.symbol, "ZZZZ");
    assert_eq!(analysis.name, "ZZZZ Inc.");
    assert_eq!(analysis.factors.len(), 5);
    assert_eq!(analysis.sentiment.overall, 0.65);
}

#[tokio::test]
async fn test_same_seed_same_analysis() {
    let make_market = || {
        StubMarketData::new()
            .with_closes("MSFT", alternating_closes(300.0, 126))
            .with_closes(BENCHMARK, alternating_closes(4000.0, 126))
            .with_meta("MSFT", "Microsoft Corporation", Some("Technology"))
    };

    let a = analyzer_for(make_market(), 0.6, 77).analyze("MSFT").await;
    let b = analyzer_for(make_market(), 0.6, 77).analyze("MSFT").await;

    let impacts_a: Vec<f64> = a.factors.iter().map(|f| f.impact).collect();
    let impacts_b: Vec<f64> = b.factors.iter().map(|f| f.impact).collect();
    assert_eq!(impacts_a, impacts_b);
    assert_eq!(a.sentiment.social, b.sentiment.social);
}

#[tokio::test]
async fn test_factor_count_invariant() {
    // Factor count must stay within [2, 6] across configurations.
    let benchmark = alternating_closes(4000.0, 126);

    for (sector, earnings_days) in [(None, None), (Some("Energy"), Some(5i64))] {
        let mut market = StubMarketData::new()
            .with_closes("T", alternating_closes(50.0, 126))
            .with_closes(BENCHMARK, benchmark.clone())
            .with_meta("T", "T Corp", sector);
        if let Some(days) = earnings_days {
            market = market.with_earnings("T", Utc::now().date_naive() - Duration::days(days));
        }

        let analysis = analyzer_for(market, 0.7, 5).analyze("T").await;
        assert!((2..=6).contains(&analysis.factors.len()));
    }
}

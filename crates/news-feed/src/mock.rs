//! Offline news: plausible generated articles for when no live news source
//! is configured or the live source fails. Randomness comes through the
//! injected `RandomSource` so tests can pin it.

use analysis_core::stats::round2;
use analysis_core::{NewsArticle, NewsDigest, NewsTopic, RandomSource};
use chrono::{Duration, Utc};
use std::sync::Arc;

const SOURCES: &[&str] = &[
    "Bloomberg",
    "CNBC",
    "Reuters",
    "Financial Times",
    "Wall Street Journal",
    "MarketWatch",
    "Barron's",
    "Investor's Business Daily",
];

const MARKET_HEADLINES: &[&str] = &[
    "Markets Rally on Economic Data",
    "Fed Signals Interest Rate Decision",
    "Tech Stocks Lead Market Gains",
    "Investors Eye Upcoming Earnings Season",
    "Global Markets React to Economic Indicators",
    "Wall Street Awaits Key Economic Reports",
    "Market Volatility Increases on Uncertainty",
    "Sectors to Watch in Current Market Conditions",
];

/// Friendly names for the well-known symbols used in queries and headlines.
pub fn company_name(symbol: &str) -> &str {
    match symbol {
        "AAPL" => "Apple",
        "MSFT" => "Microsoft",
        "AMZN" => "Amazon",
        "GOOGL" => "Google",
        "META" => "Facebook",
        "TSLA" => "Tesla",
        "NVDA" => "NVIDIA",
        "JPM" => "JPMorgan",
        "V" => "Visa",
        "JNJ" => "Johnson",
        other => other,
    }
}

pub struct MockNewsFeed {
    rng: Arc<dyn RandomSource>,
}

impl MockNewsFeed {
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }

    fn headlines_for(&self, topic: &NewsTopic) -> Vec<String> {
        match topic {
            NewsTopic::Symbol(symbol) => {
                let company = company_name(symbol);
                vec![
                    format!("{} Reports Strong Quarterly Earnings", company),
                    format!("Analysts Upgrade {} Stock to 'Buy'", company),
                    format!("{} Announces New Product Launch", company),
                    format!("Investors Optimistic About {}'s Growth Prospects", company),
                    format!("{} Expands into New Markets", company),
                    format!("CEO of {} Discusses Future Strategy", company),
                    format!("{} Faces Competition in Core Business", company),
                    format!("Market Reaction to {}'s Recent Announcements", company),
                ]
            }
            NewsTopic::Sector(sector) => vec![
                format!("{} Sector Shows Strong Performance", sector),
                format!("Analysts Optimistic About {} Stocks", sector),
                format!("Key Trends in {} Industry", sector),
                format!("Top {} Companies to Watch", sector),
                format!("{} Stocks React to Market Conditions", sector),
                format!("Investors Focus on {} Opportunities", sector),
                format!("Regulatory Changes Impact {} Sector", sector),
                format!("Future Outlook for {} Industry", sector),
            ],
            NewsTopic::Market => MARKET_HEADLINES.iter().map(|h| h.to_string()).collect(),
        }
    }

    fn summary_for(&self, topic: &NewsTopic) -> String {
        match topic {
            NewsTopic::Symbol(symbol) => format!(
                "This is a mock summary about {}. It provides information about recent developments and market reactions.",
                company_name(symbol)
            ),
            NewsTopic::Sector(sector) => format!(
                "This is a mock summary about the {} sector. It discusses industry trends, key players, and market conditions.",
                sector
            ),
            NewsTopic::Market => "This is a mock summary about market conditions and trends. It discusses recent developments and potential impacts on investors.".to_string(),
        }
    }

    fn shuffle<T>(&self, items: &mut Vec<T>) {
        // Fisher-Yates driven by the injected source.
        for i in (1..items.len()).rev() {
            let j = (self.rng.next_f64() * (i + 1) as f64) as usize;
            items.swap(i, j.min(i));
        }
    }

    pub fn digest(&self, topic: &NewsTopic, window_days: i64) -> NewsDigest {
        let mut headlines = self.headlines_for(topic);
        self.shuffle(&mut headlines);

        let now = Utc::now();
        let summary = self.summary_for(topic);
        let window = window_days.max(1);

        let mut articles: Vec<NewsArticle> = headlines
            .into_iter()
            .take(5)
            .map(|title| {
                let days_ago = (self.rng.next_f64() * window as f64) as i64;
                let hours_ago = (self.rng.next_f64() * 24.0) as i64;
                let minutes_ago = (self.rng.next_f64() * 60.0) as i64;
                let source_idx = (self.rng.next_f64() * SOURCES.len() as f64) as usize;

                NewsArticle {
                    title,
                    source: SOURCES[source_idx.min(SOURCES.len() - 1)].to_string(),
                    url: "#".to_string(),
                    published_at: now
                        - Duration::days(days_ago)
                        - Duration::hours(hours_ago)
                        - Duration::minutes(minutes_ago),
                    summary: summary.clone(),
                }
            })
            .collect();

        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        NewsDigest {
            sentiment: round2(self.rng.range(0.4, 0.7)),
            articles,
        }
    }
}

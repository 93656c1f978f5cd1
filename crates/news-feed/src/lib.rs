use analysis_core::{NewsDigest, NewsProvider, NewsTopic, RandomSource};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration as StdDuration;

pub mod lexicon;
pub mod mock;

pub use mock::{company_name, MockNewsFeed};

const NEWSAPI_URL: &str = "https://newsapi.org/v2/everything";

/// News provider over NewsAPI with the keyword-lexicon scorer. Infallible by
/// contract: a missing key or any upstream failure degrades to generated mock
/// content instead of an error.
pub struct NewsApiClient {
    client: Client,
    api_key: Option<String>,
    fallback: MockNewsFeed,
}

impl NewsApiClient {
    pub fn new(api_key: Option<String>, timeout: StdDuration, rng: Arc<dyn RandomSource>) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            fallback: MockNewsFeed::new(rng),
        }
    }

    fn query_for(topic: &NewsTopic) -> String {
        match topic {
            NewsTopic::Symbol(symbol) => format!("{} OR {}", symbol, company_name(symbol)),
            NewsTopic::Sector(sector) => {
                format!("{} sector OR {} stocks OR {} industry", sector, sector, sector)
            }
            NewsTopic::Market => {
                "stock market OR investing OR \"wall street\" OR \"financial markets\"".to_string()
            }
        }
    }

    async fn fetch_live(
        &self,
        topic: &NewsTopic,
        window_days: i64,
        api_key: &str,
    ) -> Result<NewsDigest, String> {
        let to = Utc::now();
        let from = to - Duration::days(window_days);

        let response = self
            .client
            .get(NEWSAPI_URL)
            .query(&[
                ("q", Self::query_for(topic).as_str()),
                ("from", &from.format("%Y-%m-%d").to_string()),
                ("to", &to.format("%Y-%m-%d").to_string()),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", "5"),
                ("apiKey", api_key),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("NewsAPI HTTP {}", response.status()));
        }

        let body: NewsApiResponse = response.json().await.map_err(|e| e.to_string())?;
        if body.status != "ok" || body.articles.is_empty() {
            return Err(format!("NewsAPI status {}, {} articles", body.status, body.articles.len()));
        }

        let articles: Vec<analysis_core::NewsArticle> = body
            .articles
            .into_iter()
            .map(|a| analysis_core::NewsArticle {
                title: a.title.unwrap_or_default(),
                source: a.source.name.unwrap_or_default(),
                url: a.url.unwrap_or_default(),
                published_at: a.published_at.unwrap_or_else(Utc::now),
                summary: a.description.unwrap_or_default(),
            })
            .collect();

        let sentiment = lexicon::score_articles(&articles);

        Ok(NewsDigest {
            articles,
            sentiment,
        })
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    async fn sentiment(&self, topic: &NewsTopic, window_days: i64) -> NewsDigest {
        let api_key = match &self.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => {
                tracing::debug!("no NewsAPI key configured, serving mock news");
                return self.fallback.digest(topic, window_days);
            }
        };

        match self.fetch_live(topic, window_days, &api_key).await {
            Ok(digest) => digest,
            Err(err) => {
                tracing::warn!("NewsAPI fetch failed ({}), serving mock news", err);
                self.fallback.digest(topic, window_days)
            }
        }
    }
}

/// The mock feed is itself a full provider, selected by configuration for
/// offline operation.
#[async_trait]
impl NewsProvider for MockNewsFeed {
    async fn sentiment(&self, topic: &NewsTopic, window_days: i64) -> NewsDigest {
        self.digest(topic, window_days)
    }
}

// --- NewsAPI wire types ---

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<chrono::DateTime<Utc>>,
    source: NewsApiSource,
}

#[derive(Debug, Default, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

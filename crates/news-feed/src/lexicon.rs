//! Keyword-lexicon sentiment scoring over article titles and summaries.

use analysis_core::stats::round2;
use analysis_core::NewsArticle;

const POSITIVE_WORDS: &[&str] = &[
    "up", "rise", "rising", "gain", "gains", "positive", "profit", "profits",
    "growth", "growing", "increase", "increasing", "improved", "strong", "stronger",
    "success", "successful", "outperform", "beat", "exceeds", "exceeded",
];

const NEGATIVE_WORDS: &[&str] = &[
    "down", "fall", "falling", "drop", "drops", "negative", "loss", "losses",
    "decline", "declining", "decrease", "decreasing", "weak", "weaker",
    "fail", "failed", "miss", "missed", "underperform", "below",
];

fn count_occurrences(text: &str, word: &str) -> usize {
    text.matches(word).count()
}

/// Score a batch of articles into [0, 1]. Occurrence counting is substring
/// based ("up" also hits "upgrade"), and the ratio is squeezed into
/// [0.3, 0.7] to keep single noisy headlines from pinning the score.
/// No keyword hits at all reads as neutral 0.5.
pub fn score_articles(articles: &[NewsArticle]) -> f64 {
    let mut positive = 0usize;
    let mut negative = 0usize;

    for article in articles {
        let title = article.title.to_lowercase();
        let summary = article.summary.to_lowercase();

        for word in POSITIVE_WORDS {
            positive += count_occurrences(&title, word) + count_occurrences(&summary, word);
        }
        for word in NEGATIVE_WORDS {
            negative += count_occurrences(&title, word) + count_occurrences(&summary, word);
        }
    }

    let total = positive + negative;
    if total == 0 {
        return 0.5;
    }

    round2(0.3 + (positive as f64 / total as f64) * 0.4)
}

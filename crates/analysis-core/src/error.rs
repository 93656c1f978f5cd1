use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Upstream market or news data could not be fetched. The analysis
    /// engines catch this internally and switch to the documented placeholder
    /// payloads; only the raw price endpoints surface it to callers.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A guaranteed-impossible state was observed (e.g. an empty factor
    /// list). Logged and surfaced as a generic internal error.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

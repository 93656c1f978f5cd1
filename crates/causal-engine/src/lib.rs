//! The decision core: causal factor synthesis, recommendation aggregation
//! and sector-level relative performance. Everything here is request-scoped
//! and stateless; providers are reached through trait objects and any
//! upstream `DataUnavailable` is converted into the documented placeholder
//! payloads rather than surfaced.

pub mod analyzer;
pub mod fallback;
pub mod recommendation;
pub mod sector;

pub use analyzer::FactorAnalyzer;
pub use recommendation::RecommendationEngine;
pub use sector::SectorAnalyzer;

#[cfg(test)]
pub(crate) mod test_support;

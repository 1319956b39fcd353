use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::PricePoint;
use crate::models::quote::PriceQuote;

/// Trait abstraction for all market-data providers.
///
/// Each source (Yahoo Finance, Alpha Vantage) implements this trait. If an
/// API stops working or changes, we replace only that one implementation —
/// the rest of the codebase is untouched. Providers return raw results and
/// hard errors; degrading a failed ticker to an "unavailable" quote is the
/// quote service's job, not theirs.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the current quote for one ticker: best-effort latest price
    /// plus whatever display metadata (name, currency) the source exposes.
    async fn fetch_quote(&self, ticker: &str) -> Result<PriceQuote, CoreError>;

    /// Fetch daily close history for one ticker over a date range
    /// (inclusive). Returns observations sorted ascending by date; gaps
    /// (non-trading days) are NOT filled here.
    async fn fetch_history(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;
}

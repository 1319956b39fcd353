use std::collections::HashMap;

use chrono::NaiveDate;
use log::{info, warn};

use crate::models::price::{normalize_series, PricePoint};
use crate::models::quote::PriceQuote;
use crate::providers::registry::QuoteProviderRegistry;

/// Batch front-end over the provider registry.
///
/// This is where per-ticker failures stop propagating: a ticker whose fetch
/// fails on every provider comes back as an "unavailable" `PriceQuote`, and
/// a total feed outage degrades every ticker rather than failing the batch.
/// The valuation engine downstream never sees a fetch error.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// True when at least one provider is registered.
    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Names of the registered providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Fetch current quotes for a batch of tickers.
    ///
    /// Every requested ticker gets an entry in the result. Providers are
    /// tried in registration order; a provider response without a usable
    /// (finite, positive) price keeps its metadata but still counts as
    /// unavailable. Blank tickers are skipped.
    pub async fn fetch_quotes(&self, tickers: &[String]) -> HashMap<String, PriceQuote> {
        let valid: Vec<&String> = tickers.iter().filter(|t| !t.trim().is_empty()).collect();
        if valid.is_empty() {
            info!("no tickers to fetch quotes for");
            return HashMap::new();
        }
        info!("fetching quotes for {} ticker(s)", valid.len());

        let mut quotes = HashMap::with_capacity(valid.len());
        for ticker in valid {
            let quote = self.fetch_one(ticker).await;
            quotes.insert(ticker.clone(), quote);
        }
        quotes
    }

    /// Fetch daily close history for a batch of tickers over a date range.
    ///
    /// Only tickers that produced at least one observation appear in the
    /// result; the rest are logged as data gaps and left out, so the
    /// history aggregator excludes them instead of treating them as zero.
    /// Series are sorted and de-duplicated by date.
    pub async fn fetch_history(
        &self,
        tickers: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> HashMap<String, Vec<PricePoint>> {
        let mut series = HashMap::new();
        for ticker in tickers {
            if ticker.trim().is_empty() {
                continue;
            }
            match self.fetch_one_history(ticker, from, to).await {
                Some(points) => {
                    series.insert(ticker.clone(), points);
                }
                None => {
                    warn!("no history for {ticker} between {from} and {to}");
                }
            }
        }
        series
    }

    /// Try each provider in order until one produces a usable quote.
    async fn fetch_one(&self, ticker: &str) -> PriceQuote {
        // Metadata from a provider that answered but had no usable price —
        // better than nothing for the degraded row.
        let mut degraded: Option<PriceQuote> = None;

        for provider in self.registry.providers() {
            match provider.fetch_quote(ticker).await {
                Ok(quote) if quote.has_price() => return quote,
                Ok(quote) => {
                    warn!(
                        "{} returned no usable price for {ticker}",
                        provider.name()
                    );
                    degraded = Some(PriceQuote {
                        price: None,
                        currency: quote.currency,
                        display_name: format!("{} (Price N/A)", quote.display_name),
                    });
                }
                Err(e) => {
                    warn!("{} failed for {ticker}: {e}", provider.name());
                }
            }
        }

        degraded.unwrap_or_else(|| PriceQuote::unavailable(ticker, None))
    }

    async fn fetch_one_history(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Option<Vec<PricePoint>> {
        for provider in self.registry.providers() {
            match provider.fetch_history(ticker, from, to).await {
                Ok(points) if !points.is_empty() => {
                    return Some(normalize_series(points));
                }
                Ok(_) => {
                    warn!("{} returned empty history for {ticker}", provider.name());
                }
                Err(e) => {
                    warn!("{} history fetch failed for {ticker}: {e}", provider.name());
                }
            }
        }
        None
    }
}

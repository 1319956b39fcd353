pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;

use errors::CoreError;
use models::{
    history::HistoricalPoint,
    holding::Holding,
    price::PricePoint,
    quote::PriceQuote,
    settings::Settings,
    valuation::ValuationReport,
};
use providers::registry::QuoteProviderRegistry;
use services::{
    history_service::HistoryService, quote_service::QuoteService,
    valuation_service::ValuationService,
};
use storage::sqlite_store::SqliteStore;

/// Main entry point for the stock portfolio tracker core library.
///
/// One display request maps onto one synchronous pipeline through this
/// facade: load holdings, fetch market data, valuate, aggregate history.
/// Nothing is cached or shared across requests.
#[must_use]
pub struct PortfolioTracker {
    settings: Settings,
    quote_service: QuoteService,
    valuation_service: ValuationService,
    history_service: HistoryService,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("settings", &self.settings)
            .field("providers", &self.quote_service.provider_names())
            .finish()
    }
}

impl PortfolioTracker {
    /// Create a tracker with default settings (no categories, no API keys).
    pub fn new() -> Self {
        Self::build(Settings::default())
    }

    /// Create a tracker with explicit settings (categories, API keys,
    /// default display currency).
    pub fn with_settings(settings: Settings) -> Self {
        Self::build(settings)
    }

    /// Create a tracker with a caller-supplied provider registry instead of
    /// the defaults. Used for tests and offline/custom setups.
    pub fn with_registry(settings: Settings, registry: QuoteProviderRegistry) -> Self {
        Self {
            settings,
            quote_service: QuoteService::new(registry),
            valuation_service: ValuationService::new(),
            history_service: HistoryService::new(),
        }
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Load holdings from a `Ticker,Quantity,CostBasis` CSV file.
    /// Invalid rows are dropped at this boundary; see `storage::csv_store`.
    pub fn load_holdings_csv(&self, path: impl AsRef<Path>) -> Result<Vec<Holding>, CoreError> {
        storage::csv_store::load_holdings(path)
    }

    /// Open (or create) a SQLite holdings store.
    pub fn open_store(&self, path: impl AsRef<Path>) -> Result<SqliteStore, CoreError> {
        SqliteStore::open(path)
    }

    /// Unique tickers across the holdings, in first-appearance order.
    #[must_use]
    pub fn unique_tickers(holdings: &[Holding]) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        holdings
            .iter()
            .filter(|h| seen.insert(h.ticker.as_str()))
            .map(|h| h.ticker.clone())
            .collect()
    }

    // ── Market Data ─────────────────────────────────────────────────

    /// Fetch current quotes for a batch of tickers. Per-ticker failures
    /// come back as unavailable quotes; this never fails as a whole.
    pub async fn fetch_quotes(&self, tickers: &[String]) -> HashMap<String, PriceQuote> {
        self.quote_service.fetch_quotes(tickers).await
    }

    /// Fetch daily close history for a batch of tickers. Tickers without
    /// data are omitted from the map.
    pub async fn fetch_history(
        &self,
        tickers: &[String],
        from: NaiveDate,
        to: NaiveDate,
    ) -> HashMap<String, Vec<PricePoint>> {
        self.quote_service.fetch_history(tickers, from, to).await
    }

    // ── Valuation & History (the core) ──────────────────────────────

    /// Run one valuation pass over holdings + quotes.
    #[must_use]
    pub fn valuate(
        &self,
        holdings: &[Holding],
        quotes: &HashMap<String, PriceQuote>,
    ) -> ValuationReport {
        self.valuation_service.valuate(holdings, quotes, &self.settings)
    }

    /// Aggregate per-ticker close series into the portfolio value/gain
    /// time series. Empty result means "no chart".
    #[must_use]
    pub fn aggregate_history(
        &self,
        holdings: &[Holding],
        series: &HashMap<String, Vec<PricePoint>>,
    ) -> Vec<HistoricalPoint> {
        self.history_service.aggregate(holdings, series)
    }

    /// End-to-end pipeline for one display request: fetch quotes and
    /// history for the holdings' tickers, then valuate and aggregate.
    ///
    /// Empty holdings short-circuit to an all-zero report and no chart
    /// without touching the network.
    pub async fn report(
        &self,
        holdings: &[Holding],
        from: NaiveDate,
        to: NaiveDate,
    ) -> (ValuationReport, Vec<HistoricalPoint>) {
        if holdings.is_empty() {
            let report = self
                .valuation_service
                .valuate(&[], &HashMap::new(), &self.settings);
            return (report, Vec::new());
        }

        let tickers = Self::unique_tickers(holdings);
        let quotes = self.quote_service.fetch_quotes(&tickers).await;
        let series = self.quote_service.fetch_history(&tickers, from, to).await;

        let report = self.valuation_service.valuate(holdings, &quotes, &self.settings);
        let history = self.history_service.aggregate(holdings, &series);
        (report, history)
    }

    // ── Settings & Providers ────────────────────────────────────────

    /// Get current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Set an API key for a provider (e.g. "alphavantage").
    /// Rebuilds the provider registry so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: String, key: String) {
        self.settings.api_keys.insert(provider, key);
        let registry = QuoteProviderRegistry::new_with_defaults(&self.settings.api_keys);
        self.quote_service = QuoteService::new(registry);
    }

    /// Remove an API key for a provider.
    /// Rebuilds the provider registry so the removal takes effect immediately.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.settings.api_keys.remove(provider).is_some();
        if removed {
            let registry = QuoteProviderRegistry::new_with_defaults(&self.settings.api_keys);
            self.quote_service = QuoteService::new(registry);
        }
        removed
    }

    /// Check if at least one quote provider is available.
    #[must_use]
    pub fn has_provider(&self) -> bool {
        self.quote_service.has_provider()
    }

    /// Names of the available providers, in fallback order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.quote_service.provider_names()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(settings: Settings) -> Self {
        let registry = QuoteProviderRegistry::new_with_defaults(&settings.api_keys);
        Self {
            settings,
            quote_service: QuoteService::new(registry),
            valuation_service: ValuationService::new(),
            history_service: HistoryService::new(),
        }
    }
}

impl Default for PortfolioTracker {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fully derived valuation of one holding — one table row for the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecord {
    /// Ticker symbol (records are sorted ascending by this field).
    pub ticker: String,

    /// Display name from the quote, annotated when degraded:
    /// "(Price N/A)" for an unavailable price, "(Not Found)" when the feed
    /// returned no quote at all, "(Calc Error)" for an isolated fault.
    pub display_name: String,

    /// Number of shares held.
    pub quantity: f64,

    /// cost_basis / quantity, or 0 when quantity is 0.
    pub avg_purchase_price: f64,

    /// Total purchase cost of the position.
    pub cost_basis: f64,

    /// Latest close, or 0 when unavailable.
    pub current_price: f64,

    /// quantity × current_price, or 0 when the price is unavailable.
    pub current_value: f64,

    /// current_value − cost_basis. An unavailable price counts the full
    /// position as lost: gain_loss = −cost_basis.
    pub gain_loss: f64,

    /// gain_loss / cost_basis × 100; −100 when the price is unavailable and
    /// cost_basis ≠ 0; 0 when cost_basis is 0.
    pub gain_loss_percent: f64,

    /// Currency the price is denominated in, "N/A" when unknown.
    pub currency: String,

    /// Name of the configured category this ticker belongs to (e.g. "RSU"),
    /// if any.
    pub category: Option<String>,

    /// Set when a computation fault was isolated to this record. Errored
    /// records carry zeroed derived fields and are excluded from summaries.
    pub error: bool,
}

/// Currency-unaware totals over a set of valuation records.
///
/// Values are summed as plain numbers even when the underlying records are
/// denominated in different currencies. Known limitation; no FX conversion
/// happens anywhere in this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost_basis: f64,
    pub total_gain_loss: f64,
}

impl PortfolioSummary {
    /// Fold one record's figures into the running totals.
    pub fn accumulate(&mut self, record: &ValuationRecord) {
        self.total_value += record.current_value;
        self.total_cost_basis += record.cost_basis;
        self.total_gain_loss += record.gain_loss;
    }
}

/// Complete output of one valuation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationReport {
    /// One record per holding, sorted ascending by ticker.
    pub records: Vec<ValuationRecord>,

    /// Global totals over all non-errored records.
    pub summary: PortfolioSummary,

    /// Per-category subtotals, keyed by configured category name.
    pub category_summaries: BTreeMap<String, PortfolioSummary>,

    /// Informational label for the totals (most frequent currency among
    /// valued records). Does not affect any numbers.
    pub display_currency: String,
}

use serde::{Deserialize, Serialize};

/// A single equity position as supplied by a holdings store.
///
/// Loaders guarantee `quantity > 0` and numeric fields before a holding
/// reaches the valuation pipeline; the core does not re-validate.
/// `cost_basis` is the TOTAL amount paid for the position, not per-share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker symbol, used as the case-sensitive key into quote/history maps.
    pub ticker: String,

    /// Number of shares held (positive).
    pub quantity: f64,

    /// Total purchase cost of the position.
    pub cost_basis: f64,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, quantity: f64, cost_basis: f64) -> Self {
        Self {
            ticker: ticker.into(),
            quantity,
            cost_basis,
        }
    }
}

use serde::{Deserialize, Serialize};

/// A snapshot of a ticker's current price and display metadata, produced
/// fresh per request by the quote service. Never cached by the core.
///
/// "Unavailable" is represented exactly once, here: `price: None` means no
/// usable current price exists for the ticker (fetch failure, missing data,
/// or a non-positive/non-finite value from the provider). Likewise
/// `currency: None` means the provider did not report one. Both the
/// valuation engine and the history aggregator consume this one
/// representation instead of ad hoc zero/null sentinels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Latest close, or `None` when unavailable.
    pub price: Option<f64>,

    /// ISO currency code the price is denominated in, or `None` when unknown.
    pub currency: Option<String>,

    /// Human-readable name. Defaults to the ticker; annotated by the quote
    /// service (e.g. "AAPL (Price N/A)") when the price was degraded.
    pub display_name: String,
}

impl PriceQuote {
    /// A quote with a usable price.
    pub fn available(
        price: f64,
        currency: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            price: Some(price),
            currency: Some(currency.into()),
            display_name: display_name.into(),
        }
    }

    /// A degraded quote for a ticker whose price could not be fetched.
    /// The display name carries the "(Price N/A)" annotation so callers
    /// render the row rather than dropping it.
    pub fn unavailable(ticker: &str, currency: Option<String>) -> Self {
        Self {
            price: None,
            currency,
            display_name: format!("{ticker} (Price N/A)"),
        }
    }

    /// True when the quote carries a usable (positive, finite) price.
    #[must_use]
    pub fn has_price(&self) -> bool {
        self.price.is_some_and(|p| p.is_finite() && p > 0.0)
    }
}

use std::collections::HashMap;

use log::warn;

use crate::models::holding::Holding;
use crate::models::quote::PriceQuote;
use crate::models::settings::Settings;
use crate::models::valuation::{PortfolioSummary, ValuationRecord, ValuationReport};

/// Derives all displayed financial metrics from holdings + a quote feed.
///
/// Pure business logic — no I/O, no API calls. Partial market data arrives
/// already degraded (quotes with `price: None`), so valuation itself never
/// fails: every holding produces a record, every record that is not
/// fault-isolated contributes to the totals.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Run one valuation pass.
    ///
    /// Per holding:
    /// 1. Look up the quote by ticker; a missing quote is treated exactly
    ///    like an explicit unavailable one.
    /// 2. With a usable price: value = quantity × price,
    ///    gain = value − cost_basis.
    /// 3. Without one: value 0, gain −cost_basis (full loss), percent −100,
    ///    annotated display name.
    /// 4. Accumulate into the global summary and the matching category
    ///    subtotal.
    ///
    /// A non-finite quantity or cost basis is a per-holding fault: that
    /// record is emitted zeroed and flagged, excluded from all summaries,
    /// and the remaining holdings are unaffected.
    ///
    /// Records come back sorted ascending by ticker. Totals knowingly mix
    /// currencies; `display_currency` is only a label for them.
    pub fn valuate(
        &self,
        holdings: &[Holding],
        quotes: &HashMap<String, PriceQuote>,
        settings: &Settings,
    ) -> ValuationReport {
        let mut records = Vec::with_capacity(holdings.len());
        let mut summary = PortfolioSummary::default();

        // Every configured category gets a subtotal, even when empty.
        let mut category_summaries: std::collections::BTreeMap<String, PortfolioSummary> =
            settings
                .categories
                .keys()
                .map(|name| (name.clone(), PortfolioSummary::default()))
                .collect();

        for holding in holdings {
            let record = self.valuate_holding(holding, quotes.get(holding.ticker.as_str()), settings);

            if !record.error {
                summary.accumulate(&record);
                if let Some(category) = &record.category {
                    if let Some(subtotal) = category_summaries.get_mut(category) {
                        subtotal.accumulate(&record);
                    }
                }
            }

            records.push(record);
        }

        records.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        let display_currency = Self::pick_display_currency(&records, &settings.default_currency);

        ValuationReport {
            records,
            summary,
            category_summaries,
            display_currency,
        }
    }

    fn valuate_holding(
        &self,
        holding: &Holding,
        quote: Option<&PriceQuote>,
        settings: &Settings,
    ) -> ValuationRecord {
        let ticker = holding.ticker.clone();
        let category = settings
            .categories
            .iter()
            .find(|(_, tickers)| tickers.contains(ticker.as_str()))
            .map(|(name, _)| name.clone());

        // Fault isolation: a non-finite number slipping through the loader
        // must not poison the totals or abort the batch.
        if !holding.quantity.is_finite() || !holding.cost_basis.is_finite() {
            warn!("calculation fault for {ticker}: non-finite quantity or cost basis");
            return ValuationRecord {
                display_name: format!("{ticker} (Calc Error)"),
                ticker,
                quantity: 0.0,
                avg_purchase_price: 0.0,
                cost_basis: 0.0,
                current_price: 0.0,
                current_value: 0.0,
                gain_loss: 0.0,
                gain_loss_percent: 0.0,
                currency: "N/A".to_string(),
                category,
                error: true,
            };
        }

        let avg_purchase_price = if holding.quantity != 0.0 {
            holding.cost_basis / holding.quantity
        } else {
            0.0
        };

        if let Some(quote) = quote.filter(|q| q.has_price()) {
            let current_price = quote.price.unwrap_or(0.0);
            let current_value = holding.quantity * current_price;
            let gain_loss = current_value - holding.cost_basis;
            let gain_loss_percent = if holding.cost_basis != 0.0 {
                (gain_loss / holding.cost_basis) * 100.0
            } else {
                0.0
            };

            ValuationRecord {
                display_name: quote.display_name.clone(),
                ticker,
                quantity: holding.quantity,
                avg_purchase_price,
                cost_basis: holding.cost_basis,
                current_price,
                current_value,
                gain_loss,
                gain_loss_percent,
                currency: quote.currency.clone().unwrap_or_else(|| "N/A".to_string()),
                category,
                error: false,
            }
        } else {
            // Quote missing entirely, or present without a usable price.
            // The position is carried at full loss so the row still renders.
            let (display_name, currency) = match quote {
                Some(q) => (
                    q.display_name.clone(),
                    q.currency.clone().unwrap_or_else(|| "N/A".to_string()),
                ),
                None => (format!("{ticker} (Not Found)"), "N/A".to_string()),
            };
            warn!("no usable price for {ticker}; carrying position at full loss");

            let gain_loss = -holding.cost_basis;
            let gain_loss_percent = if holding.cost_basis != 0.0 { -100.0 } else { 0.0 };

            ValuationRecord {
                display_name,
                ticker,
                quantity: holding.quantity,
                avg_purchase_price,
                cost_basis: holding.cost_basis,
                current_price: 0.0,
                current_value: 0.0,
                gain_loss,
                gain_loss_percent,
                currency,
                category,
                error: false,
            }
        }
    }

    /// Pick the label currency for the (currency-mixing) totals: the most
    /// frequent currency among records that were actually valued, ties
    /// broken by first encounter; then any known currency; then the
    /// configured default.
    fn pick_display_currency(records: &[ValuationRecord], default_currency: &str) -> String {
        // First-encounter order matters for tie-breaking, so count into a
        // Vec instead of a HashMap.
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for record in records {
            if record.currency == "N/A" || record.current_value <= 0.0 {
                continue;
            }
            match counts.iter_mut().find(|(c, _)| *c == record.currency) {
                Some((_, n)) => *n += 1,
                None => counts.push((record.currency.as_str(), 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (currency, count) in counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((currency, count));
            }
        }
        if let Some((currency, _)) = best {
            return currency.to_string();
        }

        records
            .iter()
            .find(|r| r.currency != "N/A")
            .map(|r| r.currency.clone())
            .unwrap_or_else(|| default_currency.to_string())
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use log::warn;

use crate::models::history::HistoricalPoint;
use crate::models::holding::Holding;
use crate::models::price::PricePoint;

/// Aggregates per-ticker daily close series into one portfolio-level
/// value/gain time series.
///
/// Pure business logic, no I/O. An empty result means "no chart" — callers
/// suppress rendering instead of drawing a degenerate one.
pub struct HistoryService;

impl HistoryService {
    pub fn new() -> Self {
        Self
    }

    /// Build the daily total-value / total-gain series.
    ///
    /// The date axis is the union of all tickers' observation dates. Each
    /// ticker is forward-filled independently across that axis: on a date
    /// where ticker A has no close but ticker B does, A contributes its
    /// last known close. A ticker contributes nothing before its first
    /// observation, and a ticker entirely absent from the feed is excluded
    /// from every date's sum (logged as a data gap, not treated as zero).
    ///
    /// `total_gain` is measured against the CURRENT total cost basis,
    /// summed once over all holdings and held constant across dates.
    pub fn aggregate(
        &self,
        holdings: &[Holding],
        series: &HashMap<String, Vec<PricePoint>>,
    ) -> Vec<HistoricalPoint> {
        if holdings.is_empty() || series.is_empty() {
            return Vec::new();
        }

        // Collapse duplicate-ticker holdings into one quantity per ticker.
        let mut quantities: HashMap<&str, f64> = HashMap::new();
        for holding in holdings {
            if holding.quantity.is_finite() {
                *quantities.entry(holding.ticker.as_str()).or_insert(0.0) += holding.quantity;
            }
        }

        // Pair each held ticker with its series; sorted by ticker so the
        // per-date summation order is deterministic.
        let mut covered: Vec<(&str, f64, &[PricePoint])> = Vec::new();
        for (ticker, quantity) in &quantities {
            match series.get(*ticker).filter(|s| !s.is_empty()) {
                Some(s) => covered.push((*ticker, *quantity, s.as_slice())),
                None => {
                    warn!("no price history for {ticker}; excluded from historical totals");
                }
            }
        }
        if covered.is_empty() {
            return Vec::new();
        }
        covered.sort_by_key(|(ticker, _, _)| *ticker);

        let axis: BTreeSet<NaiveDate> = covered
            .iter()
            .flat_map(|(_, _, s)| s.iter().map(|p| p.date))
            .collect();

        // Constant baseline: the cost basis of today's positions, including
        // holdings that have no history. Non-finite values are skipped the
        // same way the valuation pass isolates them.
        let total_cost_basis: f64 = holdings
            .iter()
            .filter(|h| h.cost_basis.is_finite())
            .map(|h| h.cost_basis)
            .sum();

        let mut cursors = vec![0usize; covered.len()];
        let mut last_close: Vec<Option<f64>> = vec![None; covered.len()];
        let mut points = Vec::with_capacity(axis.len());

        for date in axis {
            let mut total_value = 0.0;
            for (i, (_, quantity, s)) in covered.iter().enumerate() {
                while cursors[i] < s.len() && s[cursors[i]].date <= date {
                    last_close[i] = Some(s[cursors[i]].close);
                    cursors[i] += 1;
                }
                if let Some(close) = last_close[i] {
                    total_value += quantity * close;
                }
            }
            points.push(HistoricalPoint {
                date,
                total_value,
                total_gain: total_value - total_cost_basis,
            });
        }

        points
    }
}

impl Default for HistoryService {
    fn default() -> Self {
        Self::new()
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily close observation (date → close price).
///
/// A ticker's historical series is a `Vec<PricePoint>` sorted ascending by
/// date with unique dates; the quote service normalizes provider output
/// into this shape before the history aggregator sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Sort a raw series ascending by date and collapse duplicate dates,
/// keeping the last observation for each date.
pub fn normalize_series(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    points.sort_by_key(|p| p.date);
    points.dedup_by(|next, prev| {
        if next.date == prev.date {
            // dedup_by removes `next`; keep its (later) close in `prev`
            prev.close = next.close;
            true
        } else {
            false
        }
    });
    points
}

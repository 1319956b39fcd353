use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point of the portfolio's historical value/gain series.
///
/// The frontend consumes these as two parallel numeric series (value and
/// gain) over a shared ascending date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,

    /// Σ over tickers with history of quantity × forward-filled close.
    pub total_value: f64,

    /// total_value − current total cost basis. The cost basis is the
    /// CURRENT one, held constant across all dates — the series shows what
    /// today's positions would have gained, not point-in-time book value.
    pub total_gain: f64,
}

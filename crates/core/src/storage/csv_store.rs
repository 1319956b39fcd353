use std::path::Path;

use log::{info, warn};

use crate::errors::CoreError;
use crate::models::holding::Holding;

/// Required columns, in no particular order. Extra columns are ignored.
const REQUIRED_COLUMNS: [&str; 3] = ["Ticker", "Quantity", "CostBasis"];

/// Load holdings from a `Ticker,Quantity,CostBasis` CSV file.
///
/// This is the validation boundary the core relies on: every holding it
/// returns has a non-empty ticker, a positive quantity, and a numeric cost
/// basis. Rows that fail those checks are dropped with a warning, never
/// passed through.
///
/// A missing or empty file yields an empty portfolio (warned, not an
/// error) so a fresh install renders an empty dashboard instead of a
/// failure page. A present file with the wrong columns IS an error.
pub fn load_holdings(path: impl AsRef<Path>) -> Result<Vec<Holding>, CoreError> {
    let path = path.as_ref();

    let missing = !path.exists();
    let empty = !missing && std::fs::metadata(path)?.len() == 0;
    if missing || empty {
        warn!(
            "'{}' not found or empty; returning empty portfolio",
            path.display()
        );
        return Ok(Vec::new());
    }

    let mut reader = csv::Reader::from_path(path)?;

    // Column lookup by header name, so column order doesn't matter.
    let headers = reader.headers()?.clone();
    let index_of = |name: &str| headers.iter().position(|h| h.trim() == name);
    let missing_columns: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| index_of(c).is_none())
        .copied()
        .collect();
    if !missing_columns.is_empty() {
        return Err(CoreError::Validation(format!(
            "CSV must contain required columns. Missing: {missing_columns:?}"
        )));
    }
    let ticker_idx = index_of("Ticker").unwrap();
    let quantity_idx = index_of("Quantity").unwrap();
    let cost_basis_idx = index_of("CostBasis").unwrap();

    let mut holdings = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record?;
        let ticker = record.get(ticker_idx).unwrap_or("").trim().to_string();
        let quantity: Option<f64> = record
            .get(quantity_idx)
            .and_then(|v| v.trim().parse().ok())
            .filter(|q: &f64| q.is_finite());
        let cost_basis: Option<f64> = record
            .get(cost_basis_idx)
            .and_then(|v| v.trim().parse().ok())
            .filter(|c: &f64| c.is_finite());

        match (quantity, cost_basis) {
            (Some(quantity), Some(cost_basis)) if !ticker.is_empty() && quantity > 0.0 => {
                holdings.push(Holding {
                    ticker,
                    quantity,
                    cost_basis,
                });
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(
            "dropped {dropped} row(s) from '{}' due to invalid/zero numeric data",
            path.display()
        );
    }
    info!(
        "loaded {} holding(s) from '{}'",
        holdings.len(),
        path.display()
    );

    Ok(holdings)
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Explicit configuration passed into the tracker — nothing here is ambient
/// process state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Fallback display currency when the heuristic finds nothing better.
    pub default_currency: String,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g. "alphavantage"). Values: the API key.
    pub api_keys: HashMap<String, String>,

    /// Category membership lists for subtotal reporting, keyed by category
    /// name (e.g. "RSU" → the tickers granted as RSUs). A ticker belongs to
    /// the first category (in name order) whose set contains it.
    pub categories: BTreeMap<String, HashSet<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            api_keys: HashMap::new(),
            categories: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Convenience for the common single-list setup: everything in
    /// `tickers` is "RSU", everything else is uncategorized.
    pub fn with_rsu_list<I, S>(tickers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories = BTreeMap::new();
        categories.insert(
            "RSU".to_string(),
            tickers.into_iter().map(Into::into).collect(),
        );
        Self {
            categories,
            ..Self::default()
        }
    }
}

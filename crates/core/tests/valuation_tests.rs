// ═══════════════════════════════════════════════════════════════════
// Valuation Engine Tests — per-holding metrics, summaries, category
// subtotals, display-currency heuristic, fault isolation
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use stock_portfolio_core::models::holding::Holding;
use stock_portfolio_core::models::quote::PriceQuote;
use stock_portfolio_core::models::settings::Settings;
use stock_portfolio_core::services::valuation_service::ValuationService;

fn quote(price: f64, currency: &str, name: &str) -> PriceQuote {
    PriceQuote::available(price, currency, name)
}

fn quotes(entries: &[(&str, PriceQuote)]) -> HashMap<String, PriceQuote> {
    entries
        .iter()
        .map(|(t, q)| (t.to_string(), q.clone()))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════
//  Per-holding metrics
// ═══════════════════════════════════════════════════════════════════

#[test]
fn valued_holding_worked_example() {
    // holdings = [{AAPL, qty=10, cost=1000}], AAPL price=150
    let holdings = vec![Holding::new("AAPL", 10.0, 1000.0)];
    let feed = quotes(&[("AAPL", quote(150.0, "USD", "Apple Inc."))]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    assert_eq!(report.records.len(), 1);
    let r = &report.records[0];
    assert_eq!(r.ticker, "AAPL");
    assert_eq!(r.display_name, "Apple Inc.");
    assert_eq!(r.avg_purchase_price, 100.0);
    assert_eq!(r.current_price, 150.0);
    assert_eq!(r.current_value, 1500.0);
    assert_eq!(r.gain_loss, 500.0);
    assert_eq!(r.gain_loss_percent, 50.0);
    assert_eq!(r.currency, "USD");
    assert!(!r.error);
}

#[test]
fn value_and_gain_are_exact_products() {
    let holdings = vec![
        Holding::new("MSFT", 3.5, 700.0),
        Holding::new("GOOG", 2.0, 250.0),
    ];
    let feed = quotes(&[
        ("MSFT", quote(410.25, "USD", "Microsoft")),
        ("GOOG", quote(170.5, "USD", "Alphabet")),
    ]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    for r in &report.records {
        assert_eq!(r.current_value, r.quantity * r.current_price);
        assert_eq!(r.gain_loss, r.current_value - r.cost_basis);
    }
}

#[test]
fn missing_quote_worked_example() {
    // holdings = [{XYZ, qty=5, cost=500}], no quote for XYZ at all
    let holdings = vec![Holding::new("XYZ", 5.0, 500.0)];
    let feed = HashMap::new();

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    let r = &report.records[0];
    assert_eq!(r.display_name, "XYZ (Not Found)");
    assert_eq!(r.current_price, 0.0);
    assert_eq!(r.current_value, 0.0);
    assert_eq!(r.gain_loss, -500.0);
    assert_eq!(r.gain_loss_percent, -100.0);
    assert_eq!(r.currency, "N/A");
    assert!(!r.error);
}

#[test]
fn unavailable_price_keeps_quote_metadata() {
    let holdings = vec![Holding::new("TLX", 2.0, 80.0)];
    let feed = quotes(&[(
        "TLX",
        PriceQuote {
            price: None,
            currency: Some("EUR".to_string()),
            display_name: "Telex AG (Price N/A)".to_string(),
        },
    )]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    let r = &report.records[0];
    assert_eq!(r.display_name, "Telex AG (Price N/A)");
    assert_eq!(r.currency, "EUR");
    assert_eq!(r.current_value, 0.0);
    assert_eq!(r.gain_loss, -80.0);
    assert_eq!(r.gain_loss_percent, -100.0);
}

#[test]
fn non_positive_price_treated_as_unavailable() {
    let holdings = vec![
        Holding::new("ZERO", 1.0, 10.0),
        Holding::new("NEG", 1.0, 20.0),
    ];
    let feed = quotes(&[
        ("ZERO", quote(0.0, "USD", "Zero Corp")),
        ("NEG", quote(-5.0, "USD", "Negative Corp")),
    ]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    for r in &report.records {
        assert_eq!(r.current_price, 0.0);
        assert_eq!(r.current_value, 0.0);
        assert_eq!(r.gain_loss, -r.cost_basis);
        assert_eq!(r.gain_loss_percent, -100.0);
    }
}

#[test]
fn unavailable_with_zero_cost_basis_has_zero_percent() {
    let holdings = vec![Holding::new("FREE", 4.0, 0.0)];
    let feed = HashMap::new();

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    let r = &report.records[0];
    assert_eq!(r.gain_loss, 0.0);
    assert_eq!(r.gain_loss_percent, 0.0);
}

#[test]
fn valued_with_zero_cost_basis_has_zero_percent() {
    // Gifted shares: positive value, no cost basis, percent defined as 0
    let holdings = vec![Holding::new("GIFT", 2.0, 0.0)];
    let feed = quotes(&[("GIFT", quote(50.0, "USD", "Gift Co"))]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    let r = &report.records[0];
    assert_eq!(r.current_value, 100.0);
    assert_eq!(r.gain_loss, 100.0);
    assert_eq!(r.gain_loss_percent, 0.0);
}

#[test]
fn avg_purchase_price_is_cost_over_quantity() {
    let holdings = vec![Holding::new("AAPL", 8.0, 1000.0)];
    let feed = quotes(&[("AAPL", quote(150.0, "USD", "Apple Inc."))]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());
    assert_eq!(report.records[0].avg_purchase_price, 125.0);
}

#[test]
fn avg_purchase_price_zero_quantity() {
    // quantity 0 is filtered by loaders, but the engine must not divide by it
    let holdings = vec![Holding::new("ODD", 0.0, 100.0)];
    let feed = HashMap::new();

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());
    assert_eq!(report.records[0].avg_purchase_price, 0.0);
}

// ═══════════════════════════════════════════════════════════════════
//  Fault isolation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn non_finite_holding_is_isolated() {
    let holdings = vec![
        Holding::new("AAPL", 10.0, 1000.0),
        Holding::new("BAD", f64::NAN, 100.0),
        Holding::new("MSFT", 1.0, 300.0),
    ];
    let feed = quotes(&[
        ("AAPL", quote(150.0, "USD", "Apple Inc.")),
        ("BAD", quote(10.0, "USD", "Bad Corp")),
        ("MSFT", quote(400.0, "USD", "Microsoft")),
    ]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    // All three rows are present; the faulty one is flagged and zeroed
    assert_eq!(report.records.len(), 3);
    let bad = report.records.iter().find(|r| r.ticker == "BAD").unwrap();
    assert!(bad.error);
    assert_eq!(bad.display_name, "BAD (Calc Error)");
    assert_eq!(bad.current_value, 0.0);
    assert_eq!(bad.cost_basis, 0.0);
    assert_eq!(bad.gain_loss, 0.0);

    // Summary covers only the healthy records
    assert_eq!(report.summary.total_value, 1500.0 + 400.0);
    assert_eq!(report.summary.total_cost_basis, 1000.0 + 300.0);
    assert_eq!(report.summary.total_gain_loss, 500.0 + 100.0);
}

#[test]
fn non_finite_cost_basis_is_isolated() {
    let holdings = vec![Holding::new("INF", 1.0, f64::INFINITY)];
    let feed = quotes(&[("INF", quote(10.0, "USD", "Infinite"))]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());
    assert!(report.records[0].error);
    assert_eq!(report.summary.total_cost_basis, 0.0);
}

// ═══════════════════════════════════════════════════════════════════
//  Summaries & categories
// ═══════════════════════════════════════════════════════════════════

#[test]
fn summary_totals_match_record_sums() {
    let holdings = vec![
        Holding::new("AAPL", 10.0, 1000.0),
        Holding::new("MISSING", 5.0, 500.0),
        Holding::new("MSFT", 2.0, 600.0),
    ];
    let feed = quotes(&[
        ("AAPL", quote(150.0, "USD", "Apple Inc.")),
        ("MSFT", quote(400.0, "USD", "Microsoft")),
    ]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    let value: f64 = report.records.iter().map(|r| r.current_value).sum();
    let cost: f64 = report.records.iter().map(|r| r.cost_basis).sum();
    let gain: f64 = report.records.iter().map(|r| r.gain_loss).sum();
    assert_eq!(report.summary.total_value, value);
    assert_eq!(report.summary.total_cost_basis, cost);
    assert_eq!(report.summary.total_gain_loss, gain);

    // The unavailable holding drags the totals down by its full cost basis
    assert_eq!(report.summary.total_gain_loss, 500.0 - 500.0 + 200.0);
}

#[test]
fn disjoint_exhaustive_categories_sum_to_global() {
    let mut settings = Settings::default();
    settings
        .categories
        .insert("RSU".to_string(), ["AAPL".to_string()].into_iter().collect());
    settings.categories.insert(
        "Brokerage".to_string(),
        ["MSFT".to_string(), "XYZ".to_string()].into_iter().collect(),
    );

    let holdings = vec![
        Holding::new("AAPL", 10.0, 1000.0),
        Holding::new("MSFT", 2.0, 600.0),
        Holding::new("XYZ", 5.0, 500.0), // no quote → full loss
    ];
    let feed = quotes(&[
        ("AAPL", quote(150.0, "USD", "Apple Inc.")),
        ("MSFT", quote(400.0, "USD", "Microsoft")),
    ]);

    let report = ValuationService::new().valuate(&holdings, &feed, &settings);

    let rsu = &report.category_summaries["RSU"];
    let brokerage = &report.category_summaries["Brokerage"];
    assert_eq!(rsu.total_value, 1500.0);
    assert_eq!(rsu.total_cost_basis, 1000.0);
    assert_eq!(
        rsu.total_value + brokerage.total_value,
        report.summary.total_value
    );
    assert_eq!(
        rsu.total_cost_basis + brokerage.total_cost_basis,
        report.summary.total_cost_basis
    );
    assert_eq!(
        rsu.total_gain_loss + brokerage.total_gain_loss,
        report.summary.total_gain_loss
    );
}

#[test]
fn records_carry_their_category() {
    let settings = Settings::with_rsu_list(["AAPL"]);
    let holdings = vec![
        Holding::new("AAPL", 10.0, 1000.0),
        Holding::new("MSFT", 2.0, 600.0),
    ];
    let feed = quotes(&[
        ("AAPL", quote(150.0, "USD", "Apple Inc.")),
        ("MSFT", quote(400.0, "USD", "Microsoft")),
    ]);

    let report = ValuationService::new().valuate(&holdings, &feed, &settings);

    let aapl = report.records.iter().find(|r| r.ticker == "AAPL").unwrap();
    let msft = report.records.iter().find(|r| r.ticker == "MSFT").unwrap();
    assert_eq!(aapl.category.as_deref(), Some("RSU"));
    assert_eq!(msft.category, None);
}

#[test]
fn configured_categories_present_even_when_empty() {
    let settings = Settings::with_rsu_list(["NVDA"]);
    let holdings = vec![Holding::new("AAPL", 1.0, 100.0)];
    let feed = quotes(&[("AAPL", quote(150.0, "USD", "Apple Inc."))]);

    let report = ValuationService::new().valuate(&holdings, &feed, &settings);

    let rsu = &report.category_summaries["RSU"];
    assert_eq!(rsu.total_value, 0.0);
    assert_eq!(rsu.total_cost_basis, 0.0);
}

#[test]
fn empty_holdings_produce_empty_report() {
    let report = ValuationService::new().valuate(&[], &HashMap::new(), &Settings::default());
    assert!(report.records.is_empty());
    assert_eq!(report.summary.total_value, 0.0);
    assert_eq!(report.summary.total_cost_basis, 0.0);
    assert_eq!(report.summary.total_gain_loss, 0.0);
    assert_eq!(report.display_currency, "USD");
}

#[test]
fn total_feed_outage_degrades_every_record() {
    let holdings = vec![
        Holding::new("AAPL", 10.0, 1000.0),
        Holding::new("MSFT", 2.0, 600.0),
    ];
    let feed = HashMap::new();

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    assert_eq!(report.records.len(), 2);
    for r in &report.records {
        assert_eq!(r.current_value, 0.0);
        assert!(r.display_name.ends_with("(Not Found)"));
    }
    assert_eq!(report.summary.total_value, 0.0);
    assert_eq!(report.summary.total_gain_loss, -1600.0);
}

// ═══════════════════════════════════════════════════════════════════
//  Ordering
// ═══════════════════════════════════════════════════════════════════

#[test]
fn records_sorted_ascending_by_ticker() {
    let holdings = vec![
        Holding::new("MSFT", 1.0, 100.0),
        Holding::new("AAPL", 1.0, 100.0),
        Holding::new("GOOG", 1.0, 100.0),
    ];
    let feed = HashMap::new();

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    let tickers: Vec<&str> = report.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["AAPL", "GOOG", "MSFT"]);
}

#[test]
fn ticker_ordering_is_case_sensitive_ordinal() {
    let holdings = vec![
        Holding::new("aapl", 1.0, 100.0),
        Holding::new("MSFT", 1.0, 100.0),
    ];
    let feed = HashMap::new();

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());

    // Uppercase sorts before lowercase in ordinal order
    let tickers: Vec<&str> = report.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["MSFT", "aapl"]);
}

// ═══════════════════════════════════════════════════════════════════
//  Display-currency heuristic
// ═══════════════════════════════════════════════════════════════════

#[test]
fn display_currency_is_most_frequent() {
    let holdings = vec![
        Holding::new("A", 1.0, 10.0),
        Holding::new("B", 1.0, 10.0),
        Holding::new("C", 1.0, 10.0),
    ];
    let feed = quotes(&[
        ("A", quote(10.0, "EUR", "A")),
        ("B", quote(10.0, "EUR", "B")),
        ("C", quote(10.0, "USD", "C")),
    ]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());
    assert_eq!(report.display_currency, "EUR");
}

#[test]
fn display_currency_tie_broken_by_first_encounter() {
    // Records iterate sorted by ticker: GBP (at "A") is seen before JPY
    let holdings = vec![
        Holding::new("B", 1.0, 10.0),
        Holding::new("A", 1.0, 10.0),
    ];
    let feed = quotes(&[
        ("A", quote(10.0, "GBP", "A")),
        ("B", quote(10.0, "JPY", "B")),
    ]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());
    assert_eq!(report.display_currency, "GBP");
}

#[test]
fn display_currency_ignores_unvalued_records() {
    // The EUR record has no usable price, so its currency doesn't qualify
    // for the frequency count — but it still qualifies for the fallback.
    let holdings = vec![Holding::new("A", 1.0, 10.0)];
    let feed = quotes(&[(
        "A",
        PriceQuote {
            price: None,
            currency: Some("EUR".to_string()),
            display_name: "A (Price N/A)".to_string(),
        },
    )]);

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());
    assert_eq!(report.display_currency, "EUR");
}

#[test]
fn display_currency_defaults_when_nothing_known() {
    let holdings = vec![Holding::new("A", 1.0, 10.0)];
    let feed = HashMap::new();

    let report = ValuationService::new().valuate(&holdings, &feed, &Settings::default());
    assert_eq!(report.display_currency, "USD");
}

#[test]
fn display_currency_uses_configured_default() {
    let settings = Settings {
        default_currency: "PLN".to_string(),
        ..Settings::default()
    };
    let report = ValuationService::new().valuate(&[], &HashMap::new(), &settings);
    assert_eq!(report.display_currency, "PLN");
}

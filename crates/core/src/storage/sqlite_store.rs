use std::path::Path;

use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::storage::csv_store;

/// Result of seeding the database from a CSV file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// New holdings committed.
    pub inserted: usize,
    /// CSV rows skipped because the ticker already existed.
    pub skipped: usize,
}

/// SQLite-backed holdings store.
///
/// One row per ticker; `seed_from_csv` mirrors the CSV loader's validation
/// (the CSV loader IS the validation — only its surviving rows are offered
/// to the database) and skips tickers that are already present rather than
/// overwriting them.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the holdings database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), CoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS holdings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticker TEXT NOT NULL UNIQUE,
                quantity REAL NOT NULL,
                cost_basis REAL NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Insert a holding unless its ticker already exists.
    /// Returns `true` when inserted, `false` when skipped.
    pub fn insert_holding(&self, holding: &Holding) -> Result<bool, CoreError> {
        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM holdings WHERE ticker = ?1",
                params![holding.ticker],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            warn!(
                "ticker '{}' already exists in the database; skipping insertion",
                holding.ticker
            );
            return Ok(false);
        }

        self.conn.execute(
            "INSERT INTO holdings (ticker, quantity, cost_basis) VALUES (?1, ?2, ?3)",
            params![holding.ticker, holding.quantity, holding.cost_basis],
        )?;
        Ok(true)
    }

    /// Seed the database from a `Ticker,Quantity,CostBasis` CSV file.
    /// All inserts happen in one transaction; a failure rolls back the
    /// whole batch.
    pub fn seed_from_csv(&mut self, csv_path: impl AsRef<Path>) -> Result<SeedOutcome, CoreError> {
        let holdings = csv_store::load_holdings(csv_path)?;
        info!("seeding {} valid CSV row(s) into the database", holdings.len());

        let tx = self.conn.transaction()?;
        let mut outcome = SeedOutcome::default();

        for holding in &holdings {
            let exists: Option<i64> = tx
                .query_row(
                    "SELECT id FROM holdings WHERE ticker = ?1",
                    params![holding.ticker],
                    |row| row.get(0),
                )
                .optional()?;
            if exists.is_some() {
                warn!(
                    "ticker '{}' already exists in the database; skipping insertion",
                    holding.ticker
                );
                outcome.skipped += 1;
                continue;
            }
            tx.execute(
                "INSERT INTO holdings (ticker, quantity, cost_basis) VALUES (?1, ?2, ?3)",
                params![holding.ticker, holding.quantity, holding.cost_basis],
            )?;
            outcome.inserted += 1;
        }

        tx.commit()?;
        info!(
            "seeding finished: {} inserted, {} skipped",
            outcome.inserted, outcome.skipped
        );
        Ok(outcome)
    }

    /// Load all holdings, ordered by ticker. Rows with non-positive
    /// quantity are dropped here the same way the CSV loader drops them.
    pub fn load_holdings(&self) -> Result<Vec<Holding>, CoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT ticker, quantity, cost_basis FROM holdings ORDER BY ticker")?;
        let rows = stmt.query_map([], |row| {
            Ok(Holding {
                ticker: row.get(0)?,
                quantity: row.get(1)?,
                cost_basis: row.get(2)?,
            })
        })?;

        let mut holdings = Vec::new();
        let mut dropped = 0usize;
        for row in rows {
            let holding = row?;
            if holding.quantity > 0.0 {
                holdings.push(holding);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!("dropped {dropped} database row(s) with non-positive quantity");
        }
        Ok(holdings)
    }
}

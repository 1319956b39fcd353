pub mod csv_store;
pub mod sqlite_store;

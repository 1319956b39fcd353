pub mod history;
pub mod holding;
pub mod price;
pub mod quote;
pub mod settings;
pub mod valuation;

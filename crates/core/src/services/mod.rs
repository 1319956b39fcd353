pub mod history_service;
pub mod quote_service;
pub mod valuation_service;

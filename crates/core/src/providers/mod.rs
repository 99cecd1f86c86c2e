pub mod registry;
pub mod traits;

// Price source implementations
pub mod backend;
pub mod marketstack;
pub mod yahoo_finance;

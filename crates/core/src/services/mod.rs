pub mod allocation_service;
pub mod chart_service;
pub mod price_service;
pub mod trading_calendar;

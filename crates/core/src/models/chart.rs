use serde::{Deserialize, Serialize};

/// One slice of the allocation pie: how much of the balance went to a symbol.
///
/// The core computes these, the frontend only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub symbol: String,

    /// Percentage of the initial balance (0–100)
    pub allocation: f64,

    /// Dollar amount initially allocated
    pub initial_value: f64,
}

/// One bar of the per-stock return chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnBar {
    pub symbol: String,
    pub return_percentage: f64,
    pub return_value: f64,
}

/// Chart-ready view of a single calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCharts {
    pub allocation: Vec<AllocationSlice>,
    pub returns: Vec<ReturnBar>,
}

use crate::models::chart::{AllocationSlice, PerformanceCharts, ReturnBar};
use crate::models::performance::PortfolioPerformance;

/// Generates chart-ready data sets from a calculation result.
///
/// The core computes all the numbers, the frontend only renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Allocation pie: one slice per holding with a non-zero share,
    /// in input order.
    pub fn allocation_chart(&self, performance: &PortfolioPerformance) -> Vec<AllocationSlice> {
        performance
            .stocks
            .iter()
            .filter(|s| s.allocation > 0.0)
            .map(|s| AllocationSlice {
                symbol: s.symbol.clone(),
                allocation: s.allocation,
                initial_value: s.initial_value,
            })
            .collect()
    }

    /// Return bars, best performer first.
    pub fn return_chart(&self, performance: &PortfolioPerformance) -> Vec<ReturnBar> {
        let mut bars: Vec<ReturnBar> = performance
            .stocks
            .iter()
            .map(|s| ReturnBar {
                symbol: s.symbol.clone(),
                return_percentage: s.return_percentage,
                return_value: s.return_value,
            })
            .collect();

        bars.sort_by(|a, b| {
            b.return_percentage
                .partial_cmp(&a.return_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        bars
    }

    pub fn charts(&self, performance: &PortfolioPerformance) -> PerformanceCharts {
        PerformanceCharts {
            allocation: self.allocation_chart(performance),
            returns: self.return_chart(performance),
        }
    }
}

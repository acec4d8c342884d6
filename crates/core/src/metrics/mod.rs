//! Derived financial views over a shift collection. Everything here is a
//! pure function of its input snapshot.

mod chart;
mod metrics_calculator;
mod metrics_model;

pub use chart::{AxisTick, ChartLayout, ChartPoint, TrendChart};
pub use metrics_calculator::{
    add_capped, aggregate_metrics, compute_salary, monthly_received_trend,
};
pub use metrics_model::{AgencySummary, DashboardMetrics, MonthlyAmount, TaxBreakdown};

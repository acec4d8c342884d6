use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub status: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencySummary {
    pub name: String,
    pub shift_count: usize,
    pub total_salary: Decimal,
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_shifts: usize,
    pub total_hours: Decimal,
    /// Money actually received.
    pub total_received: Decimal,
    /// Salary of shifts still `Unpaid`.
    pub total_outstanding: Decimal,
    pub by_tax_status: Vec<TaxBreakdown>,
    /// Sorted by `total_salary`, highest first.
    pub by_agency: Vec<AgencySummary>,
}

impl DashboardMetrics {
    pub fn empty() -> Self {
        DashboardMetrics {
            total_shifts: 0,
            total_hours: Decimal::ZERO,
            total_received: Decimal::ZERO,
            total_outstanding: Decimal::ZERO,
            by_tax_status: Vec::new(),
            by_agency: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAmount {
    /// `YYYY-MM`
    pub month: String,
    pub amount: Decimal,
}

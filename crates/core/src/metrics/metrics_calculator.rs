use std::collections::{BTreeMap, HashMap};

use log::debug;
use rust_decimal::Decimal;

use crate::shifts::{Shift, TaxStatus};

use super::metrics_model::{AgencySummary, DashboardMetrics, MonthlyAmount, TaxBreakdown};

/// Salary for a shift: `hours * rate`, or zero when either operand is
/// negative or the product overflows.
pub fn compute_salary(hours: Decimal, rate: Decimal) -> Decimal {
    if hours.is_sign_negative() || rate.is_sign_negative() {
        return Decimal::ZERO;
    }
    hours.checked_mul(rate).unwrap_or(Decimal::ZERO)
}

/// Running total of non-negative amounts, pinned at `Decimal::MAX` instead
/// of overflowing.
pub fn add_capped(total: Decimal, amount: Decimal) -> Decimal {
    total.checked_add(amount).unwrap_or(Decimal::MAX)
}

pub fn aggregate_metrics(shifts: &[Shift]) -> DashboardMetrics {
    if shifts.is_empty() {
        return DashboardMetrics::empty();
    }

    let mut metrics = DashboardMetrics::empty();
    metrics.total_shifts = shifts.len();

    let mut tax_totals: HashMap<TaxStatus, Decimal> = HashMap::new();
    let mut unexpected_tax: Vec<TaxStatus> = Vec::new();
    let mut agency_index: HashMap<&str, usize> = HashMap::new();

    for shift in shifts {
        metrics.total_hours = add_capped(metrics.total_hours, shift.hours);

        if shift.payment_status.is_received() {
            metrics.total_received = add_capped(metrics.total_received, shift.amount_received);
        } else if shift.payment_status.is_outstanding() {
            metrics.total_outstanding =
                add_capped(metrics.total_outstanding, shift.day_salary);
        }

        if !tax_totals.contains_key(&shift.tax_status)
            && !TaxStatus::DEFAULTS.contains(&shift.tax_status)
        {
            unexpected_tax.push(shift.tax_status.clone());
        }
        let tax_total = tax_totals
            .entry(shift.tax_status.clone())
            .or_insert(Decimal::ZERO);
        *tax_total = add_capped(*tax_total, shift.day_salary);

        match agency_index.get(shift.agency.as_str()).copied() {
            Some(idx) => {
                let summary = &mut metrics.by_agency[idx];
                summary.shift_count += 1;
                summary.total_salary = add_capped(summary.total_salary, shift.day_salary);
            }
            None => {
                agency_index.insert(shift.agency.as_str(), metrics.by_agency.len());
                metrics.by_agency.push(AgencySummary {
                    name: shift.agency.clone(),
                    shift_count: 1,
                    total_salary: shift.day_salary,
                });
            }
        }
    }

    metrics.by_tax_status = TaxStatus::DEFAULTS
        .iter()
        .chain(unexpected_tax.iter())
        .filter_map(|status| {
            tax_totals.get(status).map(|amount| TaxBreakdown {
                status: status.to_string(),
                amount: *amount,
            })
        })
        .collect();

    // Stable sort: equal totals keep first-encountered order.
    metrics
        .by_agency
        .sort_by(|a, b| b.total_salary.cmp(&a.total_salary));

    metrics
}

/// Received money per month of receipt, oldest month first.
pub fn monthly_received_trend(shifts: &[Shift]) -> Vec<MonthlyAmount> {
    let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();

    for shift in shifts {
        if !shift.payment_status.is_received() || shift.amount_received <= Decimal::ZERO {
            continue;
        }
        let Some(month) = shift.received_date.get(..7) else {
            debug!(
                "Shift {}: received date '{}' has no month, left out of trend",
                shift.id, shift.received_date
            );
            continue;
        };
        let total = by_month.entry(month.to_string()).or_insert(Decimal::ZERO);
        *total = add_capped(*total, shift.amount_received);
    }

    by_month
        .into_iter()
        .map(|(month, amount)| MonthlyAmount { month, amount })
        .collect()
}

//! Wire types for the spreadsheet script endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shiftbook_core::Shift;

/// `{status, data, message}` wrapper around every script response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Full record written back to the sheet.
///
/// Derived fields (`calculatedSalary`, display dates) are not stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPayload {
    pub id: String,
    pub date: String,
    pub agency: String,
    pub location: String,
    pub hours: Decimal,
    pub rate: Decimal,
    pub day_salary: Decimal,
    pub payment_status: String,
    pub amount_received: Decimal,
    pub received_date: String,
    pub tax_status: String,
}

impl From<&Shift> for ShiftPayload {
    fn from(shift: &Shift) -> Self {
        ShiftPayload {
            id: shift.id.clone(),
            date: String::from(shift.date.clone()),
            agency: shift.agency.clone(),
            location: shift.location.clone(),
            hours: shift.hours,
            rate: shift.rate,
            day_salary: shift.day_salary,
            payment_status: shift.payment_status.to_string(),
            amount_received: shift.amount_received,
            received_date: shift.received_date.clone(),
            tax_status: shift.tax_status.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteShiftRequest<'a> {
    pub id: &'a str,
}

//! Shift domain models.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_AGENCY, DEFAULT_LOCATION};
use crate::metrics::compute_salary;
use crate::utils::time_utils::{
    format_display, format_iso, parse_flexible_date, shift_date_today,
};

/// Date a shift was worked.
///
/// Rows written by hand in the spreadsheet can carry anything in the date
/// column. A value that does not parse is kept verbatim so it can still be
/// shown, but it has no canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShiftDate {
    Parsed(NaiveDate),
    Unparsed(String),
}

impl ShiftDate {
    pub fn parse(raw: &str) -> Self {
        match parse_flexible_date(raw) {
            Some(date) => ShiftDate::Parsed(date),
            None => ShiftDate::Unparsed(raw.trim().to_string()),
        }
    }

    /// `YYYY-MM-DD`, or an empty string when the date did not parse.
    pub fn canonical(&self) -> String {
        match self {
            ShiftDate::Parsed(date) => format_iso(*date),
            ShiftDate::Unparsed(_) => String::new(),
        }
    }

    /// `DD/MM/YYYY`, or the raw text when the date did not parse.
    pub fn display(&self) -> String {
        match self {
            ShiftDate::Parsed(date) => format_display(*date),
            ShiftDate::Unparsed(raw) => raw.clone(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ShiftDate::Parsed(_))
    }
}

impl From<String> for ShiftDate {
    fn from(raw: String) -> Self {
        ShiftDate::parse(&raw)
    }
}

impl From<ShiftDate> for String {
    fn from(date: ShiftDate) -> Self {
        match date {
            ShiftDate::Parsed(date) => format_iso(date),
            ShiftDate::Unparsed(raw) => raw,
        }
    }
}

/// Payment state of a shift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Pending,
    Received,
    /// A value outside the known vocabulary, kept as its own bucket.
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unpaid") {
            PaymentStatus::Unpaid
        } else if trimmed.eq_ignore_ascii_case("pending") {
            PaymentStatus::Pending
        } else if trimmed.eq_ignore_ascii_case("received") {
            PaymentStatus::Received
        } else {
            PaymentStatus::Other(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Received => "Received",
            PaymentStatus::Other(value) => value,
        }
    }

    pub fn is_received(&self) -> bool {
        matches!(self, PaymentStatus::Received)
    }

    /// Work done but not yet paid for. `Pending` is deliberately not outstanding.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, PaymentStatus::Unpaid)
    }
}

impl From<String> for PaymentStatus {
    fn from(raw: String) -> Self {
        PaymentStatus::parse(&raw)
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tax treatment of a shift; used only for grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaxStatus {
    #[default]
    SelfEmployed,
    Paye,
    Other(String),
}

impl TaxStatus {
    /// Categories every dashboard shows first, in this order.
    pub const DEFAULTS: [TaxStatus; 2] = [TaxStatus::SelfEmployed, TaxStatus::Paye];

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("self-employed") {
            TaxStatus::SelfEmployed
        } else if trimmed.eq_ignore_ascii_case("paye") {
            TaxStatus::Paye
        } else {
            TaxStatus::Other(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaxStatus::SelfEmployed => "Self-Employed",
            TaxStatus::Paye => "PAYE",
            TaxStatus::Other(value) => value,
        }
    }
}

impl From<String> for TaxStatus {
    fn from(raw: String) -> Self {
        TaxStatus::parse(&raw)
    }
}

impl From<TaxStatus> for String {
    fn from(status: TaxStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain model representing one worked shift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub date: ShiftDate,
    pub agency: String,
    pub location: String,
    pub hours: Decimal,
    pub rate: Decimal,
    /// Salary as persisted by the store.
    pub day_salary: Decimal,
    /// Always `hours * rate`, regardless of what the store holds.
    #[serde(default)]
    pub calculated_salary: Decimal,
    pub payment_status: PaymentStatus,
    pub amount_received: Decimal,
    pub received_date: String,
    pub tax_status: TaxStatus,
}

impl Shift {
    pub fn display_date(&self) -> String {
        self.date.display()
    }

    /// Changes the payment status, clearing the receipt fields when the
    /// new status is anything other than `Received`.
    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        self.payment_status = status;
        self.enforce_payment_invariant();
    }

    /// Returns true if receipt fields had to be cleared.
    pub fn enforce_payment_invariant(&mut self) -> bool {
        if self.payment_status.is_received() {
            return false;
        }
        let dirty = !self.amount_received.is_zero() || !self.received_date.is_empty();
        self.amount_received = Decimal::ZERO;
        self.received_date.clear();
        dirty
    }

    /// True when the stored salary disagrees with `hours * rate`.
    pub fn salary_mismatch(&self) -> bool {
        self.day_salary != self.calculated_salary
    }
}

/// Result of saving a shift through the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation prompt; nothing was sent.
    Cancelled,
}

/// Observable state of the shift store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub loading: bool,
    pub last_error: Option<String>,
    /// Generation of the collection currently shown; 0 before the first fetch.
    pub generation: u64,
    pub shift_count: usize,
}

/// Input model for the shift entry form.
///
/// Carries what the user typed. An `id` that is present in the loaded
/// collection makes the save an update; otherwise it is an add.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftInput {
    #[serde(default)]
    pub id: Option<String>,
    pub date: String,
    #[serde(default)]
    pub agency: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub hours: Decimal,
    #[serde(default)]
    pub rate: Decimal,
    #[serde(default)]
    pub day_salary: Decimal,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub amount_received: Decimal,
    #[serde(default)]
    pub received_date: String,
    #[serde(default)]
    pub tax_status: TaxStatus,
}

impl ShiftInput {
    /// Blank form for a shift worked on `date`.
    pub fn new_for(date: NaiveDate) -> Self {
        let hours = Decimal::new(8, 0);
        let rate = Decimal::new(55, 0);
        ShiftInput {
            id: None,
            date: format_iso(date),
            agency: "Locum Agency 1".to_string(),
            location: "City Hospital".to_string(),
            hours,
            rate,
            day_salary: compute_salary(hours, rate),
            payment_status: PaymentStatus::Unpaid,
            amount_received: Decimal::ZERO,
            received_date: String::new(),
            tax_status: TaxStatus::SelfEmployed,
        }
    }

    pub fn set_hours(&mut self, hours: Decimal) {
        self.hours = hours;
        self.day_salary = compute_salary(self.hours, self.rate);
    }

    pub fn set_rate(&mut self, rate: Decimal) {
        self.rate = rate;
        self.day_salary = compute_salary(self.hours, self.rate);
    }

    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        if !status.is_received() {
            self.amount_received = Decimal::ZERO;
            self.received_date.clear();
        }
        self.payment_status = status;
    }

    /// Non-empty id, if the form carries one.
    pub fn existing_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Builds the full record to persist.
    ///
    /// Salary is recomputed from hours and rate, negative amounts are
    /// clamped to zero and an id is generated when the form has none.
    pub fn into_shift(self) -> Shift {
        let id = self
            .existing_id()
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let hours = self.hours.max(Decimal::ZERO);
        let rate = self.rate.max(Decimal::ZERO);
        let salary = compute_salary(hours, rate);
        let received_date = match parse_flexible_date(&self.received_date) {
            Some(date) => format_iso(date),
            None => self.received_date.trim().to_string(),
        };

        let mut shift = Shift {
            id,
            date: ShiftDate::parse(&self.date),
            agency: non_blank_or(self.agency, DEFAULT_AGENCY),
            location: non_blank_or(self.location, DEFAULT_LOCATION),
            hours,
            rate,
            day_salary: salary,
            calculated_salary: salary,
            payment_status: self.payment_status,
            amount_received: self.amount_received.max(Decimal::ZERO),
            received_date,
            tax_status: self.tax_status,
        };
        shift.enforce_payment_invariant();
        shift
    }
}

impl Default for ShiftInput {
    fn default() -> Self {
        ShiftInput::new_for(shift_date_today())
    }
}

impl From<&Shift> for ShiftInput {
    fn from(shift: &Shift) -> Self {
        ShiftInput {
            id: Some(shift.id.clone()),
            date: String::from(shift.date.clone()),
            agency: shift.agency.clone(),
            location: shift.location.clone(),
            hours: shift.hours,
            rate: shift.rate,
            day_salary: shift.day_salary,
            payment_status: shift.payment_status.clone(),
            amount_received: shift.amount_received,
            received_date: shift.received_date.clone(),
            tax_status: shift.tax_status.clone(),
        }
    }
}

fn non_blank_or(value: String, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

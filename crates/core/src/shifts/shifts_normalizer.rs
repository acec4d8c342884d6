//! Converts loosely typed spreadsheet rows into [`Shift`]s.
//!
//! Rows come back from the sheet script as JSON objects whose values may be
//! numbers, numeric strings, blank strings or missing keys. Normalization
//! never fails: every malformed field falls back to a per-field default.

use std::collections::HashSet;
use std::str::FromStr;

use log::{debug, warn};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::constants::{DEFAULT_AGENCY, DEFAULT_LOCATION};
use crate::metrics::compute_salary;
use crate::utils::time_utils::{format_iso, parse_flexible_date};

use super::shifts_model::{PaymentStatus, Shift, ShiftDate, TaxStatus};

const CURRENCY_PREFIXES: [char; 3] = ['£', '$', '€'];

/// Normalizes one raw record.
///
/// Returns `None` only for an absent or `null` record. Any other value,
/// including a non-object, yields a shift built from defaults.
pub fn normalize(raw: Option<&Value>) -> Option<Shift> {
    let record = match raw {
        None | Some(Value::Null) => return None,
        Some(Value::Object(map)) => map,
        Some(other) => {
            debug!("Treating non-object shift record as empty: {}", other);
            return Some(normalize_map(&Map::new()));
        }
    };
    Some(normalize_map(record))
}

/// Normalizes a batch of records, dropping null rows.
///
/// A row whose id collides with an earlier row is renamed `{id}#{n}` with the
/// smallest free `n >= 2`, so the same sheet contents always yield the same ids.
pub fn normalize_all(records: &[Value]) -> Vec<Shift> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .iter()
        .filter_map(|record| normalize(Some(record)))
        .map(|mut shift| {
            if !seen.insert(shift.id.clone()) {
                let renamed = (2u32..)
                    .map(|n| format!("{}#{}", shift.id, n))
                    .find(|candidate| !seen.contains(candidate))
                    .unwrap_or_else(|| Uuid::new_v4().to_string());
                warn!(
                    "Duplicate shift id '{}' in store data; using '{}'",
                    shift.id, renamed
                );
                shift.id = renamed.clone();
                seen.insert(renamed);
            }
            shift
        })
        .collect()
}

fn normalize_map(record: &Map<String, Value>) -> Shift {
    let id = text(field(record, "id")).unwrap_or_else(|| Uuid::new_v4().to_string());

    let date = match text(field(record, "date")) {
        Some(raw) => {
            let date = ShiftDate::parse(&raw);
            if !date.is_valid() {
                debug!("Shift {}: keeping unparseable date '{}'", id, raw);
            }
            date
        }
        None => ShiftDate::Unparsed(String::new()),
    };

    let hours = parse_amount(field(record, "hours"));
    let rate = parse_amount(field(record, "rate"));
    let calculated_salary = compute_salary(hours, rate);
    let day_salary = match field(record, "daySalary").and_then(amount_from_value) {
        Some(stored) => stored.max(Decimal::ZERO),
        None => calculated_salary,
    };

    let received_date = match text(field(record, "receivedDate")) {
        Some(raw) => match parse_flexible_date(&raw) {
            Some(parsed) => format_iso(parsed),
            None => raw,
        },
        None => String::new(),
    };

    let mut shift = Shift {
        date,
        agency: text(field(record, "agency")).unwrap_or_else(|| DEFAULT_AGENCY.to_string()),
        location: text(field(record, "location"))
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        hours,
        rate,
        day_salary,
        calculated_salary,
        payment_status: text(field(record, "paymentStatus"))
            .map(|raw| PaymentStatus::parse(&raw))
            .unwrap_or_default(),
        amount_received: parse_amount(field(record, "amountReceived")),
        received_date,
        tax_status: text(field(record, "taxStatus"))
            .map(|raw| TaxStatus::parse(&raw))
            .unwrap_or_default(),
        id,
    };

    if shift.enforce_payment_invariant() {
        debug!(
            "Shift {}: cleared receipt fields for status '{}'",
            shift.id, shift.payment_status
        );
    }
    shift
}

/// Permissive decimal parse: missing, blank, non-numeric or negative values
/// become zero.
pub fn parse_amount(value: Option<&Value>) -> Decimal {
    value
        .and_then(amount_from_value)
        .map(|amount| amount.max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

fn amount_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => decimal_from_str(&number.to_string()),
        Value::String(raw) => {
            let cleaned: String = raw
                .trim()
                .trim_start_matches(CURRENCY_PREFIXES)
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            decimal_from_str(&cleaned)
        }
        _ => None,
    }
}

fn decimal_from_str(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Looks a key up exactly, then case-insensitively, ignoring `null`s.
fn field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    record
        .get(key)
        .or_else(|| {
            record
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .map(|(_, value)| value)
        })
        .filter(|value| !value.is_null())
}

/// Non-blank textual form of a scalar value.
fn text(value: Option<&Value>) -> Option<String> {
    let raw = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_null_record_is_none() {
        assert!(normalize(None).is_none());
        assert!(normalize(Some(&Value::Null)).is_none());
    }

    #[test]
    fn test_empty_record_gets_defaults() {
        let shift = normalize(Some(&json!({}))).unwrap();
        assert!(!shift.id.is_empty());
        assert_eq!(shift.agency, DEFAULT_AGENCY);
        assert_eq!(shift.location, DEFAULT_LOCATION);
        assert_eq!(shift.hours, Decimal::ZERO);
        assert_eq!(shift.day_salary, Decimal::ZERO);
        assert_eq!(shift.payment_status, PaymentStatus::Unpaid);
        assert_eq!(shift.tax_status, TaxStatus::SelfEmployed);
        assert_eq!(shift.date, ShiftDate::Unparsed(String::new()));
    }

    #[test]
    fn test_non_object_record_gets_defaults() {
        let shift = normalize(Some(&json!(42))).unwrap();
        assert_eq!(shift.agency, DEFAULT_AGENCY);
    }

    #[test]
    fn test_salary_computed_when_absent() {
        let shift = normalize(Some(&json!({
            "date": "2024-03-05", "hours": "8", "rate": "50"
        })))
        .unwrap();
        assert_eq!(shift.day_salary, dec!(400));
        assert_eq!(shift.calculated_salary, dec!(400));
        assert!(!shift.salary_mismatch());
    }

    #[test]
    fn test_stored_salary_is_not_overwritten() {
        let shift = normalize(Some(&json!({
            "hours": 8, "rate": 50, "daySalary": 380
        })))
        .unwrap();
        assert_eq!(shift.day_salary, dec!(380));
        assert_eq!(shift.calculated_salary, dec!(400));
        assert!(shift.salary_mismatch());
    }

    #[test]
    fn test_blank_salary_is_recomputed() {
        let shift = normalize(Some(&json!({
            "hours": "7.5", "rate": "40", "daySalary": ""
        })))
        .unwrap();
        assert_eq!(shift.day_salary, dec!(300));
    }

    #[test]
    fn test_malformed_numbers_become_zero() {
        let shift = normalize(Some(&json!({
            "hours": "eight", "rate": true, "amountReceived": [], "paymentStatus": "Received"
        })))
        .unwrap();
        assert_eq!(shift.hours, Decimal::ZERO);
        assert_eq!(shift.rate, Decimal::ZERO);
        assert_eq!(shift.amount_received, Decimal::ZERO);
    }

    #[test]
    fn test_currency_strings_parse() {
        assert_eq!(parse_amount(Some(&json!("£1,234.50"))), dec!(1234.50));
        assert_eq!(parse_amount(Some(&json!(" 55 "))), dec!(55));
        assert_eq!(parse_amount(Some(&json!("1e2"))), dec!(100));
        assert_eq!(parse_amount(Some(&json!(-5))), Decimal::ZERO);
        assert_eq!(parse_amount(None), Decimal::ZERO);
    }

    #[test]
    fn test_day_month_year_date() {
        let shift = normalize(Some(&json!({ "date": "05/03/2024" }))).unwrap();
        assert_eq!(shift.date.canonical(), "2024-03-05");
        assert_eq!(shift.display_date(), "05/03/2024");
    }

    #[test]
    fn test_unparseable_date_is_kept_for_display() {
        let shift = normalize(Some(&json!({ "date": "w/c 4th March", "hours": 8 }))).unwrap();
        assert_eq!(shift.date.canonical(), "");
        assert_eq!(shift.display_date(), "w/c 4th March");
        assert_eq!(shift.hours, dec!(8));
    }

    #[test]
    fn test_unknown_statuses_pass_through() {
        let shift = normalize(Some(&json!({
            "paymentStatus": "Invoiced", "taxStatus": "Exempt"
        })))
        .unwrap();
        assert_eq!(
            shift.payment_status,
            PaymentStatus::Other("Invoiced".to_string())
        );
        assert_eq!(shift.tax_status, TaxStatus::Other("Exempt".to_string()));
    }

    #[test]
    fn test_receipt_fields_cleared_unless_received() {
        let shift = normalize(Some(&json!({
            "paymentStatus": "Pending", "amountReceived": "400", "receivedDate": "2024-04-01"
        })))
        .unwrap();
        assert_eq!(shift.amount_received, Decimal::ZERO);
        assert_eq!(shift.received_date, "");
    }

    #[test]
    fn test_received_date_normalized() {
        let shift = normalize(Some(&json!({
            "paymentStatus": "Received", "amountReceived": 400, "receivedDate": "01/04/2024"
        })))
        .unwrap();
        assert_eq!(shift.received_date, "2024-04-01");
        assert_eq!(shift.amount_received, dec!(400));
    }

    #[test]
    fn test_numeric_id_and_header_case() {
        let shift = normalize(Some(&json!({ "ID": 17, "Agency": "Medics Direct" }))).unwrap();
        assert_eq!(shift.id, "17");
        assert_eq!(shift.agency, "Medics Direct");
    }

    #[test]
    fn test_normalize_all_skips_nulls_and_reissues_duplicates() {
        let shifts = normalize_all(&[
            json!({ "id": "a" }),
            Value::Null,
            json!({ "id": "a" }),
            json!({ "id": "b" }),
        ]);
        assert_eq!(shifts.len(), 3);
        assert_eq!(shifts[0].id, "a");
        assert_eq!(shifts[1].id, "a#2");
        assert_eq!(shifts[2].id, "b");
    }

    #[test]
    fn test_duplicate_ids_are_stable_across_fetches() {
        let rows = [
            json!({ "id": "a", "hours": 8 }),
            json!({ "id": "a", "hours": 10 }),
            json!({ "id": "a#2" }),
            json!({ "id": "a", "hours": 12 }),
        ];
        let first: Vec<String> = normalize_all(&rows).into_iter().map(|s| s.id).collect();
        let second: Vec<String> = normalize_all(&rows).into_iter().map(|s| s.id).collect();
        assert_eq!(first, vec!["a", "a#2", "a#2#2", "a#3"]);
        assert_eq!(first, second);
    }
}

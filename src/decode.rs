//! Structural decoding of raw query rows.
//!
//! Only the fields the charts need are checked (`amount`, `createdAt`,
//! `grade`, the audit totals); everything else in a row is trusted or
//! ignored. A missing or `null` list decodes to an empty `Vec`, which the
//! layouts turn into their "no data" state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::errors::InputError;
use crate::layout::AuditTotals;
use crate::series::{Event, ProgressRecord};

/// Basic user identity shown on the profile page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub id: i64,
    pub login: String,
    /// Free-form registration attributes, passed through untouched
    pub attrs: Value,
}

/// One row of a query response, with enough context to report errors.
struct Row<'a> {
    function: &'static str,
    index: usize,
    value: &'a Value,
}

impl<'a> Row<'a> {
    fn field(&self, field: &'static str) -> Result<&'a Value, InputError> {
        match self.value.get(field) {
            Some(Value::Null) | None => Err(InputError::MissingField {
                function: self.function,
                field,
                index: self.index,
            }),
            Some(v) => Ok(v),
        }
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> InputError {
        InputError::WrongType {
            function: self.function,
            field,
            index: self.index,
            expected,
        }
    }

    fn number(&self, field: &'static str) -> Result<f64, InputError> {
        self.field(field)?
            .as_f64()
            .ok_or_else(|| self.wrong_type(field, "a number"))
    }

    fn optional_number(&self, field: &'static str) -> Result<Option<f64>, InputError> {
        match self.value.get(field) {
            Some(Value::Null) | None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| self.wrong_type(field, "a number")),
        }
    }

    /// Integer field; whole-valued floats (`1500.0`) are accepted.
    fn integer(&self, field: &'static str) -> Result<i64, InputError> {
        let value = self.field(field)?;
        if let Some(n) = value.as_i64() {
            return Ok(n);
        }
        match value.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
            _ => Err(self.wrong_type(field, "an integer")),
        }
    }

    fn string(&self, field: &'static str) -> Result<&'a str, InputError> {
        self.field(field)?
            .as_str()
            .ok_or_else(|| self.wrong_type(field, "a string"))
    }

    fn timestamp(&self, field: &'static str) -> Result<DateTime<Utc>, InputError> {
        let raw = self.string(field)?;
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|_| InputError::InvalidTimestamp {
                function: self.function,
                index: self.index,
                value: raw.to_string(),
            })
    }
}

/// Rows under `key`; an absent or `null` list is empty.
fn rows<'a>(function: &'static str, data: &'a Value, key: &'static str) -> Result<Vec<Row<'a>>, InputError> {
    match data.get(key) {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .enumerate()
            .map(|(index, value)| Row { function, index, value })
            .collect()),
        Some(_) => Err(InputError::WrongType {
            function,
            field: key,
            index: 0,
            expected: "a list",
        }),
    }
}

/// First row under `key`, required.
fn first_row<'a>(function: &'static str, data: &'a Value, key: &'static str) -> Result<Row<'a>, InputError> {
    rows(function, data, key)?
        .into_iter()
        .next()
        .ok_or(InputError::MissingRoot { function, key })
}

/// XP transactions (`transaction { amount createdAt }`) in response order.
pub fn decode_events(data: &Value) -> Result<Vec<Event>, InputError> {
    const FUNCTION: &str = "decode_events";
    rows(FUNCTION, data, "transaction")?
        .iter()
        .map(|row| -> Result<Event, InputError> {
            Ok(Event::new(row.integer("amount")?, row.timestamp("createdAt")?))
        })
        .collect()
}

/// Graded progress rows (`progress { grade createdAt path }`).
///
/// The category is the row's `path`, or empty when the query did not
/// select it.
pub fn decode_progress(data: &Value) -> Result<Vec<ProgressRecord>, InputError> {
    const FUNCTION: &str = "decode_progress";
    let records = rows(FUNCTION, data, "progress")?
        .iter()
        .map(|row| -> Result<ProgressRecord, InputError> {
            let category = match row.value.get("path") {
                Some(Value::String(path)) => path.as_str(),
                _ => "",
            };
            Ok(ProgressRecord::new(
                row.number("grade")?,
                row.timestamp("createdAt")?,
                category,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    crate::log::debug!(records = records.len(), "decoded progress");
    Ok(records)
}

/// Audit totals from `user[0] { auditRatio totalUp totalDown }`.
///
/// `auditRatio` may be `null` for users with no received audits.
pub fn decode_audit_totals(data: &Value) -> Result<AuditTotals, InputError> {
    const FUNCTION: &str = "decode_audit_totals";
    let row = first_row(FUNCTION, data, "user")?;
    Ok(AuditTotals {
        total_up: row.number("totalUp")?,
        total_down: row.number("totalDown")?,
        ratio: row.optional_number("auditRatio")?,
    })
}

/// Profile from `user[0] { id login attrs }`.
pub fn decode_profile(data: &Value) -> Result<Profile, InputError> {
    const FUNCTION: &str = "decode_profile";
    let row = first_row(FUNCTION, data, "user")?;
    Ok(Profile {
        id: row.integer("id")?,
        login: row.string("login")?.to_string(),
        attrs: row.value.get("attrs").cloned().unwrap_or(Value::Null),
    })
}

/// Sum of XP from `transaction_aggregate.aggregate.sum.amount`.
///
/// A `null` sum (no transactions at all) is zero.
pub fn decode_total_xp(data: &Value) -> Result<i64, InputError> {
    const FUNCTION: &str = "decode_total_xp";
    let sum = data
        .get("transaction_aggregate")
        .and_then(|agg| agg.get("aggregate"))
        .and_then(|agg| agg.get("sum"))
        .ok_or(InputError::MissingRoot {
            function: FUNCTION,
            key: "transaction_aggregate",
        })?;

    let row = Row {
        function: FUNCTION,
        index: 0,
        value: sum,
    };
    match sum.get("amount") {
        Some(Value::Null) | None => Ok(0),
        Some(_) => row.integer("amount"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn events_in_response_order() {
        let data = json!({
            "transaction": [
                { "amount": 100, "createdAt": "2024-01-01T10:00:00Z", "path": "/a" },
                { "amount": 200.0, "createdAt": "2024-01-01T12:00:00.123456+00:00" },
                { "amount": 150, "createdAt": "2024-01-02T10:00:00+02:00" },
            ]
        });
        let events = decode_events(&data).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].amount, 200);
        assert_eq!(events[2].day(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn timestamps_are_normalized_to_utc() {
        let data = json!({
            "transaction": [{ "amount": 1, "createdAt": "2024-01-02T01:00:00+03:00" }]
        });
        let events = decode_events(&data).unwrap();
        assert_eq!(events[0].day(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn absent_or_null_list_is_empty() {
        assert_eq!(decode_events(&json!({})).unwrap(), vec![]);
        assert_eq!(decode_events(&json!({ "transaction": null })).unwrap(), vec![]);
        assert_eq!(decode_progress(&json!({ "progress": [] })).unwrap(), vec![]);
    }

    #[test]
    fn missing_amount_names_function_and_row() {
        let data = json!({
            "transaction": [
                { "amount": 1, "createdAt": "2024-01-01T00:00:00Z" },
                { "createdAt": "2024-01-01T00:00:00Z" },
            ]
        });
        let err = decode_events(&data).unwrap_err();
        assert_eq!(
            err,
            InputError::MissingField {
                function: "decode_events",
                field: "amount",
                index: 1
            }
        );
        assert_eq!(err.to_string(), "decode_events: row 1 is missing required field `amount`");
    }

    #[test]
    fn fractional_amount_is_wrong_type() {
        let data = json!({ "transaction": [{ "amount": 1.5, "createdAt": "2024-01-01T00:00:00Z" }] });
        assert!(matches!(
            decode_events(&data),
            Err(InputError::WrongType { field: "amount", expected: "an integer", .. })
        ));
    }

    #[test]
    fn bad_timestamp() {
        let data = json!({ "progress": [{ "grade": 1, "createdAt": "yesterday" }] });
        assert_eq!(
            decode_progress(&data).unwrap_err(),
            InputError::InvalidTimestamp {
                function: "decode_progress",
                index: 0,
                value: "yesterday".to_string()
            }
        );
    }

    #[test]
    fn progress_rows() {
        let data = json!({
            "progress": [
                { "id": 1, "grade": 1, "createdAt": "2024-03-01T09:00:00Z", "path": "/piscine-go/quest-01" },
                { "id": 2, "grade": 0, "createdAt": "2024-03-01T10:00:00Z" },
            ]
        });
        let records = decode_progress(&data).unwrap();
        assert!(records[0].is_passed());
        assert_eq!(records[0].category, "/piscine-go/quest-01");
        assert!(records[1].is_failed());
        assert_eq!(records[1].category, "");
    }

    #[test]
    fn null_grade_is_missing() {
        let data = json!({ "progress": [{ "grade": null, "createdAt": "2024-03-01T09:00:00Z" }] });
        assert!(matches!(
            decode_progress(&data),
            Err(InputError::MissingField { field: "grade", .. })
        ));
    }

    #[test]
    fn audit_totals() {
        let data = json!({ "user": [{ "id": 7, "auditRatio": 1.2345, "totalUp": 1_234_567, "totalDown": 1_000_000 }] });
        let totals = decode_audit_totals(&data).unwrap();
        assert_eq!(totals.total_up, 1_234_567.0);
        assert_eq!(totals.ratio, Some(1.2345));

        let no_ratio = json!({ "user": [{ "auditRatio": null, "totalUp": 0, "totalDown": 0 }] });
        assert_eq!(decode_audit_totals(&no_ratio).unwrap().ratio, None);
    }

    #[test]
    fn empty_user_list_is_missing_root() {
        let err = decode_profile(&json!({ "user": [] })).unwrap_err();
        assert_eq!(
            err,
            InputError::MissingRoot {
                function: "decode_profile",
                key: "user"
            }
        );
    }

    #[test]
    fn profile() {
        let data = json!({ "user": [{ "id": 4242, "login": "jdoe", "attrs": { "country": "UK" } }] });
        let profile = decode_profile(&data).unwrap();
        assert_eq!(profile.id, 4242);
        assert_eq!(profile.login, "jdoe");
        assert_eq!(profile.attrs["country"], "UK");
    }

    #[test]
    fn total_xp() {
        let data = json!({ "transaction_aggregate": { "aggregate": { "sum": { "amount": 706055 } } } });
        assert_eq!(decode_total_xp(&data).unwrap(), 706_055);

        let none = json!({ "transaction_aggregate": { "aggregate": { "sum": { "amount": null } } } });
        assert_eq!(decode_total_xp(&none).unwrap(), 0);

        assert!(matches!(decode_total_xp(&json!({})), Err(InputError::MissingRoot { .. })));
    }

    #[test]
    fn non_list_root_is_wrong_type() {
        let err = decode_events(&json!({ "transaction": {} })).unwrap_err();
        assert_eq!(err.to_string(), "decode_events: field `transaction` of row 0 is not a list");
    }
}

//! Conversion of title-keyed cell text into the API's column value payload.

use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::{config::ColumnMap, error::ValueFormatError};

/// Column values keyed by column id, ready to be JSON-encoded for
/// `create_item`.
pub type ColumnValues = Map<String, Value>;

/// How a column's value has to be represented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// `{"date": "YYYY-MM-DD"}`
    Date,
    /// Plain string.
    Text,
}

impl ColumnKind {
    /// Infers the kind from a column id. Date columns have ids like `date`,
    /// `date4` or `date_mkq1`.
    pub fn from_id(column_id: &str) -> Self {
        if column_id.starts_with("date") {
            Self::Date
        } else {
            Self::Text
        }
    }
}

/// Result of resolving a set of title-keyed values against a column map.
#[derive(Debug, Default)]
pub struct ColumnPayload {
    pub values: ColumnValues,
    /// Titles with no matching column. Skipped silently.
    pub unmatched: Vec<String>,
    /// Values dropped because they could not be coerced.
    pub rejected: Vec<ValueFormatError>,
}

/// Resolves `(title, raw)` pairs against `columns` and coerces each value.
///
/// Unknown titles are skipped. A value that fails coercion is dropped with a
/// warning; the remaining values are still returned.
pub fn build_column_values<I, K, V>(columns: &ColumnMap, values: I) -> ColumnPayload
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut payload = ColumnPayload::default();

    for (title, raw) in values {
        let title = title.as_ref();
        let Some(column) = columns.get(title) else {
            payload.unmatched.push(title.to_string());
            continue;
        };

        match coerce_value(title, &column.id, raw.as_ref()) {
            Ok(value) => {
                payload.values.insert(column.id.clone(), value);
            }
            Err(err) => {
                warn!(column = %title, "{err}");
                payload.rejected.push(err);
            }
        }
    }

    payload
}

/// Coerces one raw cell into the representation required by `column_id`.
///
/// # Errors
///
/// Returns [`ValueFormatError`] if a date column's value is not a valid date.
pub fn coerce_value(title: &str, column_id: &str, raw: &str) -> Result<Value, ValueFormatError> {
    match ColumnKind::from_id(column_id) {
        ColumnKind::Date => {
            let date = parse_date(raw).map_err(|reason| ValueFormatError {
                column: title.to_string(),
                value: raw.to_string(),
                reason,
            })?;
            Ok(json!({ "date": date.format("%Y-%m-%d").to_string() }))
        }
        ColumnKind::Text => Ok(Value::String(raw.to_string())),
    }
}

/// Parses permissive date text.
///
/// A trailing time component is ignored. Accepts `MM/DD/YYYY` (single-digit
/// month and day allowed) and `YYYY-MM-DD`.
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let date_part = raw
        .split_whitespace()
        .next()
        .and_then(|s| s.split('T').next())
        .ok_or_else(|| "empty date".to_string())?;

    if date_part.contains('/') {
        let parts: Vec<&str> = date_part.split('/').collect();
        let [month, day, year] = parts.as_slice() else {
            return Err("expected MM/DD/YYYY".to_string());
        };
        if year.len() != 4 {
            return Err("expected a four-digit year".to_string());
        }

        let month: u32 = month.parse().map_err(|_| "invalid month".to_string())?;
        let day: u32 = day.parse().map_err(|_| "invalid day".to_string())?;
        let year: i32 = year.parse().map_err(|_| "invalid year".to_string())?;

        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| "no such calendar date".to_string())
    } else {
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RemoteColumn;

    fn column_map() -> ColumnMap {
        ColumnMap::from_columns([
            RemoteColumn {
                id: "name".to_string(),
                title: "Name".to_string(),
            },
            RemoteColumn {
                id: "text__1".to_string(),
                title: "Owner".to_string(),
            },
            RemoteColumn {
                id: "date4".to_string(),
                title: "Due".to_string(),
            },
        ])
    }

    #[test]
    fn test_date_with_time_is_reformatted() {
        let value = coerce_value("Due", "date4", "04/30/2025 08:39").unwrap();
        assert_eq!(value, json!({ "date": "2025-04-30" }));
    }

    #[test]
    fn test_single_digit_month_and_day_are_padded() {
        let value = coerce_value("Due", "date4", "4/3/2025").unwrap();
        assert_eq!(value, json!({ "date": "2025-04-03" }));
    }

    #[test]
    fn test_iso_date_is_accepted() {
        let value = coerce_value("Due", "date", "2025-04-30 00:00:00").unwrap();
        assert_eq!(value, json!({ "date": "2025-04-30" }));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let err = coerce_value("Due", "date4", "13/45/2025").unwrap_err();
        assert_eq!(err.column, "Due");
        assert_eq!(err.value, "13/45/2025");
    }

    #[test]
    fn test_garbage_date_is_rejected() {
        assert!(coerce_value("Due", "date4", "next tuesday").is_err());
        assert!(coerce_value("Due", "date4", "4/30/25").is_err());
        assert!(coerce_value("Due", "date4", "   ").is_err());
    }

    #[test]
    fn test_text_values_pass_through() {
        let value = coerce_value("Owner", "text__1", "Ada \"the\" Lovelace").unwrap();
        assert_eq!(value, json!("Ada \"the\" Lovelace"));
    }

    #[test]
    fn test_build_skips_unknown_titles_and_drops_bad_dates() {
        let payload = build_column_values(
            &column_map(),
            [("Owner", "Ada"), ("Due", "13/45/2025"), ("Budget", "100")],
        );

        assert_eq!(payload.values.len(), 1);
        assert_eq!(payload.values["text__1"], json!("Ada"));
        assert_eq!(payload.unmatched, ["Budget"]);
        assert_eq!(payload.rejected.len(), 1);
        assert_eq!(payload.rejected[0].column, "Due");
    }

    #[test]
    fn test_build_keys_values_by_column_id() {
        let payload = build_column_values(
            &column_map(),
            [("Owner", "Ada"), ("Due", "04/30/2025 08:39")],
        );

        assert_eq!(payload.values["date4"], json!({ "date": "2025-04-30" }));
        assert!(payload.rejected.is_empty());
        assert!(payload.unmatched.is_empty());
    }
}

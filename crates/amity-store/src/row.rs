//! Column codecs shared by the `row_to_*` mappers.
//!
//! Principals are stored hex-encoded, timestamps as RFC-3339 text and
//! status enums as lowercase text; these helpers convert back, reporting
//! failures through `rusqlite::Error::FromSqlConversionFailure` so they
//! surface with the column index intact.

use amity_shared::Principal;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;

fn conversion_err(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
}

pub(crate) fn principal(row: &Row<'_>, idx: usize) -> rusqlite::Result<Principal> {
    let hex_str: String = row.get(idx)?;
    Principal::from_hex(&hex_str).map_err(|e| conversion_err(idx, format!("bad principal: {e}")))
}

pub(crate) fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let ts_str: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&ts_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, format!("bad timestamp: {e}")))
}

pub(crate) fn opt_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let ts_str: Option<String> = row.get(idx)?;
    ts_str
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| conversion_err(idx, format!("bad timestamp: {e}")))
        })
        .transpose()
}

pub(crate) fn enum_text<T>(
    row: &Row<'_>,
    idx: usize,
    parse: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    parse(&text).ok_or_else(|| conversion_err(idx, format!("unknown enum value: {text}")))
}

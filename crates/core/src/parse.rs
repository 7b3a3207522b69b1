//! Decoding of backend operation payloads.
//!
//! The backend delivers scheduled operations as JSON arrays with
//! ISO-8601-like timestamp strings. One malformed row must never corrupt
//! the shared time bounds for the others, so rows with unparsable or
//! inverted start/end are dropped and counted instead of failing the load.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Operation, TimeMs};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload is neither an operation array nor an object with a \"plan\" array")]
    UnknownPayload,
}

/// Result of decoding one payload: the usable operations plus the number
/// of rows dropped for bad timestamps.
#[derive(Debug, Clone)]
pub struct ParsedPlan {
    pub operations: Vec<Operation>,
    pub skipped_rows: usize,
}

/// One row as the backend serializes it.
#[derive(Debug, Deserialize)]
struct RawOperation {
    #[serde(default)]
    job_id: Option<i64>,
    #[serde(rename = "OrderNo", default)]
    order_no: Option<String>,
    #[serde(rename = "OpNo", default)]
    op_no: Option<String>,
    #[serde(rename = "WorkPlaceNo", default)]
    work_place_no: Option<serde_json::Value>,
    #[serde(rename = "Start", default)]
    start: Option<String>,
    #[serde(rename = "End", default)]
    end: Option<String>,
    #[serde(rename = "PriorityGroup", default)]
    priority_group: Option<i32>,
    #[serde(rename = "LatestStartDate", default)]
    latest_start_date: Option<String>,
    #[serde(rename = "StartsBeforeLSD", default)]
    starts_before_lsd: Option<bool>,
    #[serde(rename = "Buffer", default)]
    buffer: Option<i64>,
    #[serde(rename = "Reason", alias = "ReasonSelected", default)]
    reason: Option<String>,
    #[serde(rename = "IsOutsourcing", default)]
    is_outsourcing: Option<bool>,
    #[serde(rename = "OrderPos", default)]
    order_pos: Option<i64>,
}

/// Decode a payload that is either a bare operation array or the
/// visualize response shape `{"plan": [...], ...}`.
pub fn parse_operations(data: &[u8]) -> Result<ParsedPlan, ParseError> {
    let value: serde_json::Value = serde_json::from_slice(data)?;
    let rows = match &value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(obj) => {
            obj.get("plan").cloned().ok_or(ParseError::UnknownPayload)?
        }
        _ => return Err(ParseError::UnknownPayload),
    };
    let raw: Vec<RawOperation> = serde_json::from_value(rows)?;

    let mut operations = Vec::with_capacity(raw.len());
    let mut skipped = 0usize;
    for (idx, row) in raw.into_iter().enumerate() {
        match convert_row(row, idx) {
            Some(op) => operations.push(op),
            None => skipped += 1,
        }
    }

    Ok(ParsedPlan {
        operations,
        skipped_rows: skipped,
    })
}

fn convert_row(row: RawOperation, idx: usize) -> Option<Operation> {
    let start = row.start.as_deref().and_then(parse_timestamp)?;
    let end = row.end.as_deref().and_then(parse_timestamp)?;
    if start > end {
        return None;
    }
    Some(Operation {
        id: row.job_id.unwrap_or(idx as i64),
        order_no: row.order_no.unwrap_or_default(),
        op_no: row.op_no.unwrap_or_default(),
        machine_id: machine_key(row.work_place_no.as_ref()),
        start,
        end,
        priority_group: row.priority_group.unwrap_or(0),
        // A bad latest-start timestamp means "no date", not a dropped row.
        latest_start_date: row.latest_start_date.as_deref().and_then(parse_timestamp),
        starts_before_lsd: row.starts_before_lsd,
        buffer_minutes: row.buffer,
        reason: row.reason,
        is_outsourcing: row.is_outsourcing.unwrap_or(false),
        order_pos: row.order_pos,
    })
}

/// Work place numbers arrive sometimes as JSON numbers, sometimes as
/// strings; both map to the same lane key.
fn machine_key(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Parse an ISO-8601-like timestamp string to epoch milliseconds.
///
/// Accepts RFC 3339, naive date-times with or without seconds, and bare
/// dates. Returns `None` for anything else.
pub fn parse_timestamp(s: &str) -> Option<TimeMs> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis() as f64);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis() as f64);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let dt = d.and_hms_opt(0, 0, 0)?;
        return Some(dt.and_utc().timestamp_millis() as f64);
    }
    None
}

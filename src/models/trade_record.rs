use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ReportError, Result};

/// A single closed trade as consumed by the report engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub entered_at: DateTime<Utc>,
    /// Logical session date; overnight trades may roll into the prior day.
    #[serde(default)]
    pub custom_trade_day: Option<NaiveDate>,
    pub net_pnl: f64,
    pub total_size: f64,
}

impl TradeRecord {
    pub fn is_win(&self) -> bool {
        self.net_pnl > 0.0
    }
}

/// Upstream row shape. Every field is optional so validation can say
/// which one is missing instead of failing the whole payload.
#[derive(Debug, Deserialize)]
struct RawTradeRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(rename = "EnteredAt", default)]
    entered_at: Option<Value>,
    #[serde(rename = "CustomTradeDay", default)]
    custom_trade_day: Option<Value>,
    #[serde(rename = "NetPnL", default)]
    net_pnl: Option<Value>,
    #[serde(rename = "TotalSize", default)]
    total_size: Option<Value>,
}

/// Decoded records plus the rows that failed validation.
#[derive(Debug, Clone, Default)]
pub struct TradeBatch {
    pub records: Vec<TradeRecord>,
    pub rejected: Vec<ReportError>,
}

impl TradeBatch {
    pub fn new(records: Vec<TradeRecord>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_trade_days(&self) -> bool {
        self.records.iter().any(|r| r.custom_trade_day.is_some())
    }
}

/// Validate an upstream payload.
///
/// An array is decoded row by row and bad rows are set aside. An object
/// carrying `error` or `message` is the collaborator reporting a failure;
/// anything else is an unexpected shape. Neither produces records.
pub fn decode_payload(payload: Value) -> Result<TradeBatch> {
    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Object(map) => {
            let reason = map
                .get("error")
                .or_else(|| map.get("message"))
                .map(value_text);
            return Err(ReportError::UpstreamFetch(reason.unwrap_or_else(|| {
                "unexpected payload shape: expected a list of trades".to_string()
            })));
        }
        _ => {
            return Err(ReportError::UpstreamFetch(
                "unexpected payload shape: expected a list of trades".to_string(),
            ))
        }
    };

    let mut batch = TradeBatch::default();
    for (index, row) in rows.into_iter().enumerate() {
        match decode_row(index, row) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!("Dropping record: {}", e);
                batch.rejected.push(e);
            }
        }
    }

    debug!(
        "Decoded {} records ({} rejected)",
        batch.records.len(),
        batch.rejected.len()
    );
    Ok(batch)
}

fn decode_row(index: usize, row: Value) -> Result<TradeRecord> {
    let fallback_id = format!("#{}", index);
    let raw: RawTradeRecord = serde_json::from_value(row)
        .map_err(|e| ReportError::malformed(&fallback_id, format!("not a trade object: {}", e)))?;

    let id = match raw.id {
        Some(Value::Null) | None => fallback_id,
        Some(v) => value_text(&v),
    };

    let entered_at = match raw.entered_at {
        Some(Value::String(s)) => parse_instant(&s)
            .ok_or_else(|| ReportError::malformed(&id, format!("unparseable EnteredAt `{}`", s)))?,
        Some(Value::Null) | None => return Err(ReportError::malformed(&id, "missing EnteredAt")),
        Some(other) => {
            return Err(ReportError::malformed(
                &id,
                format!("unparseable EnteredAt `{}`", other),
            ))
        }
    };

    // A bad trade day only keeps the record out of the day-based reports.
    let custom_trade_day = match raw.custom_trade_day {
        Some(Value::Null) | None => None,
        Some(v) => {
            let day = match &v {
                Value::String(s) => parse_trade_day(s),
                _ => None,
            };
            if day.is_none() {
                warn!(
                    "Record {}: unparseable CustomTradeDay `{}`, excluded from daily reports",
                    id,
                    value_text(&v)
                );
            }
            day
        }
    };

    let net_pnl = number_field(&id, "NetPnL", raw.net_pnl)?;
    let total_size = number_field(&id, "TotalSize", raw.total_size)?;

    Ok(TradeRecord {
        id,
        entered_at,
        custom_trade_day,
        net_pnl,
        total_size,
    })
}

fn number_field(id: &str, field: &str, value: Option<Value>) -> Result<f64> {
    let parsed = match &value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Null) | None => {
            return Err(ReportError::malformed(id, format!("missing {}", field)))
        }
        _ => None,
    };
    match parsed {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(ReportError::malformed(
            id,
            format!("non-numeric {} `{}`", field, value.unwrap_or(Value::Null)),
        )),
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// ISO-8601 instant. A timestamp without an offset is taken as UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Trade-day label as written, time-of-day discarded.
pub fn parse_trade_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    let (date_part, rest) = (s.get(..10)?, s.get(10..)?);
    if !(rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_well_formed_rows() {
        let payload = json!([
            {
                "id": "t-1",
                "EnteredAt": "2024-01-15T14:30:00Z",
                "CustomTradeDay": "2024-01-15",
                "NetPnL": 125.5,
                "TotalSize": 2
            },
            {
                "id": 42,
                "EnteredAt": "2024-01-15T09:45:00-05:00",
                "CustomTradeDay": "2024-01-14T00:00:00",
                "NetPnL": "-40",
                "TotalSize": "1.5"
            }
        ]);
        let batch = decode_payload(payload).unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.rejected.is_empty());

        let second = &batch.records[1];
        assert_eq!(second.id, "42");
        assert_eq!(second.entered_at, parse_instant("2024-01-15T14:45:00Z").unwrap());
        assert_eq!(second.custom_trade_day, NaiveDate::from_ymd_opt(2024, 1, 14));
        assert!((second.net_pnl + 40.0).abs() < 1e-9);
        assert!((second.total_size - 1.5).abs() < 1e-9);
    }

    #[test]
    fn bad_rows_are_dropped_not_fatal() {
        let payload = json!([
            { "id": "ok", "EnteredAt": "2024-01-15T14:30:00Z", "NetPnL": 1, "TotalSize": 1 },
            { "id": "no-ts", "NetPnL": 1, "TotalSize": 1 },
            { "id": "bad-ts", "EnteredAt": "yesterday", "NetPnL": 1, "TotalSize": 1 },
            { "id": "bad-pnl", "EnteredAt": "2024-01-15T14:30:00Z", "NetPnL": "lots", "TotalSize": 1 },
            "not an object"
        ]);
        let batch = decode_payload(payload).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.rejected.len(), 4);
        assert!(batch
            .rejected
            .iter()
            .all(|e| matches!(e, ReportError::MalformedRecord { .. })));
    }

    #[test]
    fn missing_trade_day_is_allowed() {
        let payload = json!([
            { "id": "a", "EnteredAt": "2024-01-15T14:30:00Z", "NetPnL": 1, "TotalSize": 1 }
        ]);
        let batch = decode_payload(payload).unwrap();
        assert_eq!(batch.records[0].custom_trade_day, None);
        assert!(!batch.has_trade_days());
    }

    #[test]
    fn unparseable_trade_day_keeps_record() {
        let payload = json!([
            { "id": "a", "EnteredAt": "2024-01-15T14:30:00Z", "CustomTradeDay": "someday", "NetPnL": 1, "TotalSize": 1 },
            { "id": "b", "EnteredAt": "2024-01-15T15:30:00Z", "CustomTradeDay": 20240115, "NetPnL": 2, "TotalSize": 1 },
            { "id": "c", "EnteredAt": "2024-01-15T16:30:00Z", "CustomTradeDay": "2024-01-15", "NetPnL": 3, "TotalSize": 1 }
        ]);
        let batch = decode_payload(payload).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.records[0].custom_trade_day, None);
        assert_eq!(batch.records[1].custom_trade_day, None);
        assert!(batch.has_trade_days());
    }

    #[test]
    fn error_payload_is_upstream_failure() {
        let err = decode_payload(json!({ "error": "timeout" })).unwrap_err();
        assert_eq!(err, ReportError::UpstreamFetch("timeout".into()));

        let err = decode_payload(json!({ "message": "Internal server error" })).unwrap_err();
        assert_eq!(err, ReportError::UpstreamFetch("Internal server error".into()));
    }

    #[test]
    fn unexpected_shape_is_upstream_failure() {
        assert!(matches!(
            decode_payload(json!("hello")),
            Err(ReportError::UpstreamFetch(_))
        ));
        assert!(matches!(
            decode_payload(json!({ "items": [] })),
            Err(ReportError::UpstreamFetch(_))
        ));
    }

    #[test]
    fn naive_timestamps_are_utc() {
        let a = parse_instant("2024-03-01 12:00:00").unwrap();
        let b = parse_instant("2024-03-01T12:00:00Z").unwrap();
        assert_eq!(a, b);
        assert!(parse_instant("2024-03-01T12:00:00.250+00:00").is_some());
    }

    #[test]
    fn trade_day_keeps_written_date() {
        assert_eq!(
            parse_trade_day("2024-01-14T23:30:00-06:00"),
            NaiveDate::from_ymd_opt(2024, 1, 14)
        );
        assert_eq!(parse_trade_day("2024-01-14x"), None);
        assert_eq!(parse_trade_day("14/01/2024"), None);
    }
}

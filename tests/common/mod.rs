#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::{json, Value};
use std::collections::HashMap;

use trade_recap::config::Config;

/// One upstream row in the endpoint's field naming.
pub fn trade_json(id: u64, entered_at: &str, trade_day: &str, net_pnl: f64, total_size: f64) -> Value {
    json!({
        "id": id.to_string(),
        "EnteredAt": entered_at,
        "CustomTradeDay": trade_day,
        "NetPnL": net_pnl,
        "TotalSize": total_size,
    })
}

/// The UTC instant of a wall-clock time in `tz`.
pub fn utc_for_local(tz: Tz, y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    tz.with_ymd_and_hms(y, m, d, h, mi, s)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Config built from explicit settings only, never the process environment.
pub fn test_config(pairs: &[(&str, &str)]) -> Config {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| map.get(key).cloned())
}

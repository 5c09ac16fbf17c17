use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::config::Config;
use crate::models::{NightBlock, TradeRecord};

/// A trade entered at `entered_at` (RFC 3339), attributed to its UTC date.
pub fn make_record(id: u64, entered_at: &str, net_pnl: f64) -> TradeRecord {
    let entered_at = DateTime::parse_from_rfc3339(entered_at)
        .unwrap()
        .with_timezone(&Utc);
    TradeRecord {
        id: id.to_string(),
        entered_at,
        custom_trade_day: Some(entered_at.date_naive()),
        net_pnl,
        total_size: 1.0,
    }
}

/// A trade on trade day `day` (YYYY-MM-DD), entered at 15:00 UTC that day.
pub fn make_day_record(id: u64, day: &str, net_pnl: f64) -> TradeRecord {
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap();
    TradeRecord {
        id: id.to_string(),
        entered_at: date.and_hms_opt(15, 0, 0).unwrap().and_utc(),
        custom_trade_day: Some(date),
        net_pnl,
        total_size: 1.0,
    }
}

/// The UTC instant of a wall-clock time in `tz`.
pub fn utc_for_local(tz: Tz, y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    tz.with_ymd_and_hms(y, m, d, h, mi, s)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

/// Stock report settings with a small starting balance.
pub fn default_test_config() -> Config {
    Config {
        api_endpoint: "http://127.0.0.1:9/trades".to_string(),
        trade_date: None,
        request_timeout_secs: 5,
        starting_balance: 1000.0,
        hourly_timezone: chrono_tz::US::Eastern,
        time_block_timezone: chrono_tz::US::Central,
        night_block: NightBlock::Declared,
        data_dir: std::env::temp_dir()
            .join("trade_recap_test")
            .to_string_lossy()
            .to_string(),
        log_level: "error".to_string(),
    }
}

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::core::TimeBucketer;
use crate::models::NightBlock;

pub const DEFAULT_API_ENDPOINT: &str =
    "https://adhp0jlvy5.execute-api.us-east-1.amazonaws.com/default/visualize-trade-data";
pub const DEFAULT_STARTING_BALANCE: f64 = 50_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Source
    pub api_endpoint: String,
    /// Fetch only this trade day (YYYY-MM-DD) when set.
    pub trade_date: Option<String>,
    pub request_timeout_secs: u64,

    // Reports
    pub starting_balance: f64,
    pub hourly_timezone: Tz,
    pub time_block_timezone: Tz,
    pub night_block: NightBlock,

    // Output
    pub data_dir: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset or unparseable values fall back to
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        // A single deployment-wide zone wins over the per-report ones.
        let shared_tz = lookup("REPORT_TIMEZONE").and_then(|v| v.trim().parse::<Tz>().ok());
        let tz = |key: &str, default: Tz| -> Tz {
            shared_tz.unwrap_or_else(|| {
                lookup(key)
                    .and_then(|v| v.trim().parse::<Tz>().ok())
                    .unwrap_or(default)
            })
        };

        Config {
            api_endpoint: env("TRADE_API_ENDPOINT", DEFAULT_API_ENDPOINT),
            trade_date: lookup("TRADE_DATE").filter(|v| !v.trim().is_empty()),
            request_timeout_secs: env("REQUEST_TIMEOUT_SECS", "30").parse().unwrap_or(30),
            starting_balance: env("STARTING_BALANCE", "50000")
                .parse()
                .unwrap_or(DEFAULT_STARTING_BALANCE),
            hourly_timezone: tz("HOURLY_TIMEZONE", chrono_tz::US::Eastern),
            time_block_timezone: tz("TIME_BLOCK_TIMEZONE", chrono_tz::US::Central),
            night_block: NightBlock::from_str_loose(&env("NIGHT_BLOCK", "declared"))
                .unwrap_or_default(),
            data_dir: env("DATA_DIR", "data"),
            log_level: env("LOG_LEVEL", "info"),
        }
    }

    pub fn hourly_bucketer(&self) -> TimeBucketer {
        TimeBucketer::hourly(self.hourly_timezone)
    }

    pub fn time_block_bucketer(&self) -> TimeBucketer {
        TimeBucketer::time_blocks(self.time_block_timezone, self.night_block)
    }
}

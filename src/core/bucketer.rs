use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ReportError, Result};
use crate::models::{BucketKey, HourOfDay, NightBlock, TimeBlock, TradeRecord};

const MORNING_START: u32 = 9 * 60 + 30;
const LATE_MORNING_START: u32 = 12 * 60;
const EARLY_AFTERNOON_START: u32 = 15 * 60;
const EVENING_START: u32 = 17 * 60;
const CARVED_NIGHT_END: u32 = 6 * 60;

/// How trades are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketScheme {
    /// By the record's logical trade day, no timezone involved.
    Day,
    /// By local hour of entry.
    Hour { tz: Tz },
    /// By local session window of entry.
    TimeBlock { tz: Tz, night: NightBlock },
}

impl BucketScheme {
    pub fn name(&self) -> &'static str {
        match self {
            BucketScheme::Day => "day",
            BucketScheme::Hour { .. } => "hour",
            BucketScheme::TimeBlock { .. } => "time_block",
        }
    }
}

impl fmt::Display for BucketScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketScheme::Day => write!(f, "day"),
            BucketScheme::Hour { tz } => write!(f, "hour ({})", tz.name()),
            BucketScheme::TimeBlock { tz, night } => {
                write!(f, "time_block ({}, night {})", tz.name(), night)
            }
        }
    }
}

/// Assigns each trade a [`BucketKey`] under one scheme.
#[derive(Debug, Clone, Copy)]
pub struct TimeBucketer {
    pub scheme: BucketScheme,
}

impl TimeBucketer {
    pub fn new(scheme: BucketScheme) -> Self {
        Self { scheme }
    }

    pub fn day() -> Self {
        Self::new(BucketScheme::Day)
    }

    pub fn hourly(tz: Tz) -> Self {
        Self::new(BucketScheme::Hour { tz })
    }

    pub fn time_blocks(tz: Tz, night: NightBlock) -> Self {
        Self::new(BucketScheme::TimeBlock { tz, night })
    }

    pub fn bucket(&self, record: &TradeRecord) -> Result<BucketKey> {
        match self.scheme {
            BucketScheme::Day => record
                .custom_trade_day
                .map(BucketKey::Day)
                .ok_or_else(|| ReportError::malformed(&record.id, "missing CustomTradeDay")),
            BucketScheme::Hour { tz } => Ok(BucketKey::Hour(local_hour(record.entered_at, tz))),
            BucketScheme::TimeBlock { tz, night } => Ok(BucketKey::TimeBlock(classify_block(
                record.entered_at,
                tz,
                night,
            ))),
        }
    }

    /// Every key the scheme always reports, in report order. `None` for
    /// the day scheme, whose keys come from the data.
    pub fn domain(&self) -> Option<Vec<BucketKey>> {
        match self.scheme {
            BucketScheme::Day => None,
            BucketScheme::Hour { .. } => Some(HourOfDay::all().map(BucketKey::Hour).collect()),
            BucketScheme::TimeBlock { night, .. } => Some(
                TimeBlock::ALL
                    .iter()
                    .filter(|b| night != NightBlock::Omitted || **b != TimeBlock::Night)
                    .map(|b| BucketKey::TimeBlock(*b))
                    .collect(),
            ),
        }
    }
}

fn local_hour(at: DateTime<Utc>, tz: Tz) -> HourOfDay {
    HourOfDay::of_time(&at.with_timezone(&tz))
}

/// Session window for an instant, using half-open `[start, end)` minute ranges.
pub fn classify_block(at: DateTime<Utc>, tz: Tz, night: NightBlock) -> TimeBlock {
    let local = at.with_timezone(&tz);
    let minute_of_day = local.hour() * 60 + local.minute();

    if minute_of_day < MORNING_START {
        if night == NightBlock::Carved && minute_of_day < CARVED_NIGHT_END {
            TimeBlock::Night
        } else {
            TimeBlock::EarlyMorning
        }
    } else if minute_of_day < LATE_MORNING_START {
        TimeBlock::Morning
    } else if minute_of_day < EARLY_AFTERNOON_START {
        TimeBlock::LateMorning
    } else if minute_of_day < EVENING_START {
        TimeBlock::EarlyAfternoon
    } else {
        TimeBlock::Evening
    }
}

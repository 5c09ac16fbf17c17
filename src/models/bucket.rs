use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the 24 hour-of-day slots, 0 = midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HourOfDay(u8);

impl HourOfDay {
    pub fn new(hour: u32) -> Option<HourOfDay> {
        if hour < 24 {
            Some(HourOfDay(hour as u8))
        } else {
            None
        }
    }

    /// Slot holding a clock time's hour.
    pub fn of_time<T: Timelike>(time: &T) -> HourOfDay {
        HourOfDay(time.hour() as u8)
    }

    pub fn all() -> impl Iterator<Item = HourOfDay> {
        (0..24u8).map(HourOfDay)
    }

    pub fn hour(&self) -> u32 {
        self.0 as u32
    }

    /// 12-hour clock label, e.g. "12 AM", "09 AM", "01 PM".
    pub fn label(&self) -> String {
        let suffix = if self.0 < 12 { "AM" } else { "PM" };
        let h12 = match self.0 % 12 {
            0 => 12,
            h => h,
        };
        format!("{:02} {}", h12, suffix)
    }
}

impl fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Coarse intraday session windows. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBlock {
    EarlyMorning,
    Morning,
    LateMorning,
    EarlyAfternoon,
    Evening,
    Night,
}

impl TimeBlock {
    pub const ALL: [TimeBlock; 6] = [
        TimeBlock::EarlyMorning,
        TimeBlock::Morning,
        TimeBlock::LateMorning,
        TimeBlock::EarlyAfternoon,
        TimeBlock::Evening,
        TimeBlock::Night,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBlock::EarlyMorning => "Early Morning (pre-9:30)",
            TimeBlock::Morning => "Morning (9:30-12:00)",
            TimeBlock::LateMorning => "Late Morning (12:00-15:00)",
            TimeBlock::EarlyAfternoon => "Early Afternoon (15:00-17:00)",
            TimeBlock::Evening => "Evening (17:00-00:00)",
            TimeBlock::Night => "Night (00:00-06:00)",
        }
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the Night block means given the other boundaries.
///
/// With the stock boundaries Early Morning already covers 00:00-09:30, so
/// Night can never receive a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NightBlock {
    /// Night stays in the report and is always empty.
    #[default]
    Declared,
    /// Night is dropped from the report.
    Omitted,
    /// Night takes 00:00-06:00 and Early Morning shrinks to 06:00-09:30.
    Carved,
}

impl NightBlock {
    pub fn as_str(&self) -> &'static str {
        match self {
            NightBlock::Declared => "declared",
            NightBlock::Omitted => "omitted",
            NightBlock::Carved => "carved",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<NightBlock> {
        match s.trim().to_lowercase().as_str() {
            "declared" => Some(NightBlock::Declared),
            "omitted" | "omit" | "removed" => Some(NightBlock::Omitted),
            "carved" | "carve" => Some(NightBlock::Carved),
            _ => None,
        }
    }
}

impl fmt::Display for NightBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Grouping key produced by a [`crate::core::TimeBucketer`].
///
/// A single aggregation only ever holds keys of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "scheme", content = "key", rename_all = "snake_case")]
pub enum BucketKey {
    Day(NaiveDate),
    Hour(HourOfDay),
    TimeBlock(TimeBlock),
}

impl BucketKey {
    pub fn label(&self) -> String {
        match self {
            BucketKey::Day(d) => d.format("%Y-%m-%d").to_string(),
            BucketKey::Hour(h) => h.label(),
            BucketKey::TimeBlock(b) => b.as_str().to_string(),
        }
    }

    pub fn as_day(&self) -> Option<NaiveDate> {
        match self {
            BucketKey::Day(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

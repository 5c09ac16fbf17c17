use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPnl {
    pub date: NaiveDate,
    pub net_pnl: f64,
}

/// Gap-free day series: one entry per date from first to last, inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DenseDailySeries {
    days: Vec<DailyPnl>,
}

impl DenseDailySeries {
    pub fn days(&self) -> &[DailyPnl] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.last().map(|d| d.date)
    }

    pub fn total_pnl(&self) -> f64 {
        self.days.iter().map(|d| d.net_pnl).sum()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        let first = self.first_date()?;
        let offset = (date - first).num_days();
        if offset < 0 {
            return None;
        }
        self.days.get(offset as usize).map(|d| d.net_pnl)
    }

    pub fn to_map(&self) -> BTreeMap<NaiveDate, f64> {
        self.days.iter().map(|d| (d.date, d.net_pnl)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DailyPnl> {
        self.days.iter()
    }
}

pub struct CalendarFiller;

impl CalendarFiller {
    /// Fill every date in `[start, end]`, zero where `sparse` has no entry.
    ///
    /// Missing bounds default to the first and last key of `sparse`. Entries
    /// outside an explicit range are ignored.
    pub fn densify(
        sparse: &BTreeMap<NaiveDate, f64>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DenseDailySeries> {
        let start = start
            .or_else(|| sparse.keys().next().copied())
            .ok_or_else(|| ReportError::EmptyRange("no trade days to derive a start date".into()))?;
        let end = end
            .or_else(|| sparse.keys().next_back().copied())
            .ok_or_else(|| ReportError::EmptyRange("no trade days to derive an end date".into()))?;

        if start > end {
            return Err(ReportError::EmptyRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }

        let days = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| DailyPnl {
                date,
                net_pnl: sparse.get(&date).copied().unwrap_or(0.0),
            })
            .collect();

        Ok(DenseDailySeries { days })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Profit,
    Loss,
    Flat,
}

impl Tone {
    pub fn of(pnl: f64) -> Tone {
        if pnl > 0.0 {
            Tone::Profit
        } else if pnl < 0.0 {
            Tone::Loss
        } else {
            Tone::Flat
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub net_pnl: f64,
    /// False for padding days before the first or after the last date.
    pub in_range: bool,
    pub tone: Tone,
}

/// Month-calendar layout of a dense series, Monday-first weeks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarGrid {
    pub weeks: Vec<[CalendarCell; 7]>,
}

impl CalendarGrid {
    pub const WEEKDAYS: [&'static str; 7] = [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ];

    pub fn from_series(series: &DenseDailySeries) -> CalendarGrid {
        let (first, last) = match (series.first_date(), series.last_date()) {
            (Some(f), Some(l)) => (f, l),
            _ => return CalendarGrid { weeks: Vec::new() },
        };

        let week_start = first - Duration::days(first.weekday().num_days_from_monday() as i64);
        let num_weeks = (last - week_start).num_days() / 7 + 1;

        let weeks: Vec<[CalendarCell; 7]> = (0..num_weeks)
            .map(|w| {
                std::array::from_fn(|d| {
                    let date = week_start + Duration::days(w * 7 + d as i64);
                    let pnl = series.get(date);
                    let net_pnl = pnl.unwrap_or(0.0);
                    CalendarCell {
                        date,
                        net_pnl,
                        in_range: pnl.is_some(),
                        tone: Tone::of(net_pnl),
                    }
                })
            })
            .collect();

        CalendarGrid { weeks }
    }
}

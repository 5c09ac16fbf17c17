use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::calendar::DenseDailySeries;
use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub net_pnl: f64,
    pub cumulative_pnl: f64,
    pub account_balance: f64,
}

pub struct BalanceSeries;

impl BalanceSeries {
    /// Running balance over a dense day series, oldest day first.
    /// Zero days carry the previous balance forward.
    pub fn accumulate(series: &DenseDailySeries, starting_balance: f64) -> Result<Vec<BalancePoint>> {
        if series.is_empty() {
            return Err(ReportError::EmptyInput(
                "no days to accumulate a balance over".into(),
            ));
        }

        let mut cumulative = 0.0;
        let points = series
            .iter()
            .map(|day| {
                cumulative += day.net_pnl;
                BalancePoint {
                    date: day.date,
                    net_pnl: day.net_pnl,
                    cumulative_pnl: cumulative,
                    account_balance: starting_balance + cumulative,
                }
            })
            .collect();

        Ok(points)
    }
}

/// Headline figures for the balance view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub starting_balance: f64,
    pub final_balance: f64,
    pub total_pnl: f64,
    pub total_return_pct: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
}

impl BalanceSummary {
    pub fn from_points(points: &[BalancePoint], starting_balance: f64) -> Self {
        let mut max_equity = starting_balance;
        let mut max_drawdown = 0.0f64;
        let mut max_drawdown_pct = 0.0f64;

        for p in points {
            if p.account_balance > max_equity {
                max_equity = p.account_balance;
            }
            let dd = max_equity - p.account_balance;
            if dd > max_drawdown {
                max_drawdown = dd;
                max_drawdown_pct = if max_equity > 0.0 {
                    dd / max_equity * 100.0
                } else {
                    0.0
                };
            }
        }

        let final_balance = points
            .last()
            .map(|p| p.account_balance)
            .unwrap_or(starting_balance);
        let total_pnl = final_balance - starting_balance;

        BalanceSummary {
            starting_balance,
            final_balance,
            total_pnl,
            total_return_pct: if starting_balance > 0.0 {
                total_pnl / starting_balance * 100.0
            } else {
                0.0
            },
            max_drawdown,
            max_drawdown_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::calendar::CalendarFiller;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dense(entries: &[(NaiveDate, f64)]) -> DenseDailySeries {
        let sparse: BTreeMap<NaiveDate, f64> = entries.iter().copied().collect();
        CalendarFiller::densify(&sparse, None, None).unwrap()
    }

    #[test]
    fn carries_balance_across_empty_days() {
        let series = dense(&[(date(2024, 1, 1), 100.0), (date(2024, 1, 3), -50.0)]);
        let points = BalanceSeries::accumulate(&series, 1000.0).unwrap();
        let balances: Vec<f64> = points.iter().map(|p| p.account_balance).collect();
        assert_eq!(balances, vec![1100.0, 1100.0, 1050.0]);
        assert_eq!(points[1].net_pnl, 0.0);
        assert_eq!(points[2].cumulative_pnl, 50.0);
    }

    #[test]
    fn final_balance_is_start_plus_total() {
        let series = dense(&[
            (date(2024, 2, 1), 12.5),
            (date(2024, 2, 4), -3.25),
            (date(2024, 2, 9), 40.0),
        ]);
        let points = BalanceSeries::accumulate(&series, 500.0).unwrap();
        let last = points.last().unwrap();
        assert!((last.account_balance - (500.0 + series.total_pnl())).abs() < 1e-9);
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn empty_series_fails() {
        let series = DenseDailySeries::default();
        assert!(matches!(
            BalanceSeries::accumulate(&series, 1000.0),
            Err(ReportError::EmptyInput(_))
        ));
    }

    #[test]
    fn summary_tracks_peak_to_trough() {
        let series = dense(&[
            (date(2024, 1, 1), 200.0),
            (date(2024, 1, 2), -300.0),
            (date(2024, 1, 3), 50.0),
        ]);
        let points = BalanceSeries::accumulate(&series, 1000.0).unwrap();
        let summary = BalanceSummary::from_points(&points, 1000.0);
        assert!((summary.final_balance - 950.0).abs() < 1e-9);
        assert!((summary.total_pnl + 50.0).abs() < 1e-9);
        assert!((summary.total_return_pct + 5.0).abs() < 1e-9);
        assert!((summary.max_drawdown - 300.0).abs() < 1e-9);
        assert!((summary.max_drawdown_pct - 25.0).abs() < 1e-9);
    }
}

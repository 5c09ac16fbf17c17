use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use crate::core::{
    Aggregation, BalancePoint, BalanceSummary, BucketScheme, CalendarGrid, DenseDailySeries,
    RankedBucket, Tone,
};
use crate::error::ReportError;

/// One traded day, as in the daily profit/loss and trade-size views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub net_pnl_sum: f64,
    pub avg_trade_size: f64,
    pub trade_count: usize,
    pub win_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    /// Days with at least one trade.
    pub rows: Vec<DailyRow>,
    /// Every day in range, zero-filled.
    pub dense: DenseDailySeries,
    pub dropped: usize,
}

impl DailyReport {
    pub fn from_aggregation(agg: &Aggregation, dense: DenseDailySeries) -> Self {
        let rows = agg
            .buckets
            .iter()
            .filter_map(|(key, s)| {
                key.as_day().map(|date| DailyRow {
                    date,
                    net_pnl_sum: s.net_pnl_sum,
                    avg_trade_size: s.avg_trade_size,
                    trade_count: s.trade_count,
                    win_percentage: s.win_percentage,
                })
            })
            .collect();

        DailyReport {
            rows,
            dense,
            dropped: agg.dropped,
        }
    }
}

/// One bar of a win-rate chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateRow {
    pub label: String,
    pub total_trades: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub win_percentage: f64,
    pub net_pnl_sum: f64,
    pub normalized_score: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRateReport {
    pub scheme: BucketScheme,
    pub rows: Vec<WinRateRow>,
    pub dropped: usize,
}

impl WinRateReport {
    pub fn from_ranked(scheme: BucketScheme, agg: &Aggregation, ranked: &[RankedBucket]) -> Self {
        let rows = ranked
            .iter()
            .map(|r| {
                let s = agg.buckets.get(&r.key).cloned().unwrap_or_default();
                WinRateRow {
                    label: r.label.clone(),
                    total_trades: r.total_trades,
                    win_count: s.win_count,
                    loss_count: s.loss_count,
                    win_percentage: r.win_percentage,
                    net_pnl_sum: s.net_pnl_sum,
                    normalized_score: r.normalized_score,
                    color: r.color().hex(),
                }
            })
            .collect();

        WinRateReport {
            scheme,
            rows,
            dropped: agg.dropped,
        }
    }

    pub fn row(&self, label: &str) -> Option<&WinRateRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn total_trades(&self) -> usize {
        self.rows.iter().map(|r| r.total_trades).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub points: Vec<BalancePoint>,
    pub summary: BalanceSummary,
    pub calendar: CalendarGrid,
}

/// Latest results of one run, one entry per report. A failed report keeps
/// its error instead of an empty result.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub trades: usize,
    pub rejected: usize,
    pub daily: Result<DailyReport, ReportError>,
    pub hourly: Result<WinRateReport, ReportError>,
    pub time_blocks: Result<WinRateReport, ReportError>,
    pub balance: Result<BalanceReport, ReportError>,
}

impl ReportContext {
    pub fn failures(&self) -> Vec<&ReportError> {
        [
            self.daily.as_ref().err(),
            self.hourly.as_ref().err(),
            self.time_blocks.as_ref().err(),
            self.balance.as_ref().err(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<Value> {
        Ok(json!({
            "generated_at": self.generated_at.to_rfc3339(),
            "source": self.source,
            "trades": self.trades,
            "rejected": self.rejected,
            "daily": section("daily", &self.daily)?,
            "hourly": section("hourly", &self.hourly)?,
            "time_blocks": section("time_blocks", &self.time_blocks)?,
            "balance": section("balance", &self.balance)?,
        }))
    }

    /// Write the JSON export into `dir`, returning the file path.
    pub fn write_export(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(format!(
            "recap_{}.json",
            self.generated_at.format("%Y%m%d_%H%M%S")
        ));
        let json = serde_json::to_string_pretty(&self.to_json()?)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(70));
        println!("  TRADE RECAP");
        println!("{}", "=".repeat(70));
        println!("  Source:      {}", self.source);
        println!("  Trades:      {} ({} rejected)", self.trades, self.rejected);

        println!();
        println!("  BALANCE");
        println!("  ───────────────────────────────────");
        match &self.balance {
            Ok(b) => {
                let s = &b.summary;
                println!("  Start:       ${:.2}", s.starting_balance);
                println!("  Final:       ${:.2}", s.final_balance);
                println!("  PnL:         ${:+.2}", s.total_pnl);
                println!("  Return:      {:+.1}%", s.total_return_pct);
                println!("  Max DD:      ${:.2} ({:.1}%)", s.max_drawdown, s.max_drawdown_pct);
            }
            Err(e) => println!("  FAILED: {}", e),
        }

        println!();
        println!("  DAILY");
        println!("  ───────────────────────────────────");
        match &self.daily {
            Ok(d) => {
                for row in &d.rows {
                    println!(
                        "  {}: {:>3} trades | WR {:>3.0}% | PnL ${:+.2} | Avg size {:.2}",
                        row.date, row.trade_count, row.win_percentage, row.net_pnl_sum, row.avg_trade_size
                    );
                }
                if d.dropped > 0 {
                    println!("  ({} trades without a trade day skipped)", d.dropped);
                }
            }
            Err(e) => println!("  FAILED: {}", e),
        }

        print_win_rates("BY HOUR", &self.hourly);
        print_win_rates("BY TIME BLOCK", &self.time_blocks);

        if let Ok(b) = &self.balance {
            println!();
            println!("  CALENDAR");
            println!("  ───────────────────────────────────");
            let header: Vec<String> = CalendarGrid::WEEKDAYS
                .iter()
                .map(|d| format!("{:>10}", d.chars().take(3).collect::<String>()))
                .collect();
            println!("  {}", header.join(""));
            for week in &b.calendar.weeks {
                let cells: Vec<String> = week
                    .iter()
                    .map(|c| {
                        if !c.in_range {
                            format!("{:>10}", ".")
                        } else {
                            let mark = match c.tone {
                                Tone::Profit => "+",
                                Tone::Loss => "-",
                                Tone::Flat => " ",
                            };
                            format!("{:>9.0}{}", c.net_pnl.abs(), mark)
                        }
                    })
                    .collect();
                println!("  {}", cells.join(""));
            }
        }

        println!("{}", "=".repeat(70));
    }
}

fn section<T: Serialize>(report: &str, outcome: &Result<T, ReportError>) -> serde_json::Result<Value> {
    match outcome {
        Ok(r) => serde_json::to_value(r),
        Err(e) => Ok(json!({ "error": { "report": report, "message": e.to_string() } })),
    }
}

fn print_win_rates(title: &str, outcome: &Result<WinRateReport, ReportError>) {
    println!();
    println!("  {}", title);
    println!("  ───────────────────────────────────");
    match outcome {
        Ok(r) => {
            for row in &r.rows {
                let bar = "#".repeat((row.win_percentage / 5.0).round() as usize);
                println!(
                    "  {:>30}: {:>3} trades | WR {:>3.0}% {}",
                    row.label, row.total_trades, row.win_percentage, bar
                );
            }
        }
        Err(e) => println!("  FAILED: {}", e),
    }
}

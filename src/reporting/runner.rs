use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::{
    Aggregator, BalanceSeries, BalanceSummary, CalendarFiller, CalendarGrid, TimeBucketer,
    WinRateRanker,
};
use crate::error::{ReportError, Result};
use crate::models::TradeBatch;
use crate::source::{fetch_batch, TradeSource};

use super::report::{BalanceReport, DailyReport, ReportContext, WinRateReport};

/// Builds every report over one batch of trades.
///
/// Each report succeeds or fails on its own; an upstream failure stops the
/// run before any report is built.
pub struct ReportRunner {
    pub config: Config,
}

impl ReportRunner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn fetch_and_run(&self, source: &mut dyn TradeSource) -> Result<ReportContext> {
        let batch = fetch_batch(source).await?;
        Ok(self.run(&batch, &source.describe()))
    }

    pub fn run(&self, batch: &TradeBatch, source: &str) -> ReportContext {
        info!("=== RECAP START ===");
        info!(
            "{} trades, {} rejected at decode | hourly {} | time blocks {} (night {}) | balance ${:.2}",
            batch.len(),
            batch.rejected.len(),
            self.config.hourly_timezone.name(),
            self.config.time_block_timezone.name(),
            self.config.night_block,
            self.config.starting_balance
        );

        let daily = self.daily(batch);
        let balance = match &daily {
            Ok(d) => self.balance(d),
            Err(e) => Err(e.clone()),
        };
        let hourly = self.win_rates(batch, self.config.hourly_bucketer());
        let time_blocks = self.win_rates(batch, self.config.time_block_bucketer());

        let ctx = ReportContext {
            generated_at: Utc::now(),
            source: source.to_string(),
            trades: batch.len(),
            rejected: batch.rejected.len(),
            daily: daily.map_err(|e| e.in_report("daily")),
            hourly: hourly.map_err(|e| e.in_report("hourly")),
            time_blocks: time_blocks.map_err(|e| e.in_report("time_blocks")),
            balance: balance.map_err(|e| e.in_report("balance")),
        };

        for failure in ctx.failures() {
            warn!("{}", failure);
        }
        info!("=== RECAP COMPLETE ===");
        ctx
    }

    fn daily(&self, batch: &TradeBatch) -> Result<DailyReport> {
        if batch.is_empty() {
            return Err(ReportError::EmptyInput("no trades to summarise by day".into()));
        }
        if !batch.has_trade_days() {
            return Err(ReportError::SchemaMismatch {
                field: "CustomTradeDay".into(),
            });
        }

        let agg = Aggregator::aggregate(&batch.records, &TimeBucketer::day());
        let dense = CalendarFiller::densify(&agg.day_sums(), None, None)?;
        debug!(
            "Daily: {} traded days over a {}-day span",
            agg.buckets.len(),
            dense.len()
        );
        Ok(DailyReport::from_aggregation(&agg, dense))
    }

    fn balance(&self, daily: &DailyReport) -> Result<BalanceReport> {
        let start = self.config.starting_balance;
        let points = BalanceSeries::accumulate(&daily.dense, start)?;
        let summary = BalanceSummary::from_points(&points, start);
        info!(
            "Balance: ${:.2} -> ${:.2} ({:+.1}%)",
            summary.starting_balance, summary.final_balance, summary.total_return_pct
        );
        Ok(BalanceReport {
            points,
            summary,
            calendar: CalendarGrid::from_series(&daily.dense),
        })
    }

    fn win_rates(&self, batch: &TradeBatch, bucketer: TimeBucketer) -> Result<WinRateReport> {
        if batch.is_empty() {
            return Err(ReportError::EmptyInput(format!(
                "no trades to bucket by {}",
                bucketer.scheme.name()
            )));
        }

        let agg = Aggregator::aggregate(&batch.records, &bucketer);
        let ranked = WinRateRanker::rank(&agg.buckets);
        for r in &ranked {
            debug!(
                "  {}: {} trades | WR {:.1}% | score {:.2}",
                r.label, r.total_trades, r.win_percentage, r.normalized_score
            );
        }
        Ok(WinRateReport::from_ranked(bucketer.scheme, &agg, &ranked))
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::core::bucketer::TimeBucketer;
use crate::models::{BucketKey, TradeRecord};

/// Summary statistics for one bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub net_pnl_sum: f64,
    pub avg_trade_size: f64,
    pub trade_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub total_trades: usize,
    /// 0 for an empty bucket.
    pub win_percentage: f64,
}

impl BucketSummary {
    /// Wins over total trades, or `None` when the bucket is empty.
    pub fn win_rate(&self) -> Option<f64> {
        if self.total_trades > 0 {
            Some(self.win_count as f64 / self.total_trades as f64 * 100.0)
        } else {
            None
        }
    }

    fn from_trades(trades: &[&TradeRecord]) -> Self {
        let trade_count = trades.len();
        let win_count = trades.iter().filter(|t| t.is_win()).count();
        let loss_count = trade_count - win_count;
        let net_pnl_sum: f64 = trades.iter().map(|t| t.net_pnl).sum();
        let avg_trade_size = if trade_count > 0 {
            trades.iter().map(|t| t.total_size).sum::<f64>() / trade_count as f64
        } else {
            0.0
        };

        let mut summary = BucketSummary {
            net_pnl_sum,
            avg_trade_size,
            trade_count,
            win_count,
            loss_count,
            total_trades: win_count + loss_count,
            win_percentage: 0.0,
        };
        summary.win_percentage = summary.win_rate().unwrap_or(0.0);
        summary
    }
}

/// Per-bucket summaries in key order, plus how many records could not be
/// bucketed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub buckets: BTreeMap<BucketKey, BucketSummary>,
    pub dropped: usize,
}

impl Aggregation {
    pub fn total_trades(&self) -> usize {
        self.buckets.values().map(|b| b.trade_count).sum()
    }

    pub fn total_pnl(&self) -> f64 {
        self.buckets.values().map(|b| b.net_pnl_sum).sum()
    }

    /// Day buckets as a date → net P&L map, ready for densifying.
    pub fn day_sums(&self) -> BTreeMap<chrono::NaiveDate, f64> {
        self.buckets
            .iter()
            .filter_map(|(k, s)| k.as_day().map(|d| (d, s.net_pnl_sum)))
            .collect()
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Group records by the bucketer's key and reduce each group.
    ///
    /// Fixed-domain schemes report every key, empty or not. Records the
    /// bucketer rejects are counted in `dropped` and skipped.
    pub fn aggregate(records: &[TradeRecord], bucketer: &TimeBucketer) -> Aggregation {
        let mut groups: BTreeMap<BucketKey, Vec<&TradeRecord>> = BTreeMap::new();
        if let Some(domain) = bucketer.domain() {
            for key in domain {
                groups.insert(key, Vec::new());
            }
        }

        let mut dropped = 0;
        for r in records {
            match bucketer.bucket(r) {
                Ok(key) => groups.entry(key).or_default().push(r),
                Err(e) => {
                    warn!("{} bucketing skipped a record: {}", bucketer.scheme.name(), e);
                    dropped += 1;
                }
            }
        }

        let buckets: BTreeMap<BucketKey, BucketSummary> = groups
            .into_iter()
            .map(|(key, trades)| (key, BucketSummary::from_trades(&trades)))
            .collect();

        debug!(
            "Aggregated {} records into {} {} buckets ({} dropped)",
            records.len() - dropped,
            buckets.len(),
            bucketer.scheme.name(),
            dropped
        );

        Aggregation { buckets, dropped }
    }
}

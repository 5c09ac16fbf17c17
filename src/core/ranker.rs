use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::aggregator::BucketSummary;
use crate::models::BucketKey;

// Red-yellow-green diverging scale, low to high.
const SCALE_LOW: Rgb = Rgb(215, 48, 39);
const SCALE_MID: Rgb = Rgb(255, 255, 191);
const SCALE_HIGH: Rgb = Rgb(26, 152, 80);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

/// Color for a score in [0, 1]; out-of-range scores are clamped.
pub fn score_color(score: f64) -> Rgb {
    let t = if score.is_nan() { 0.5 } else { score.clamp(0.0, 1.0) };
    if t <= 0.5 {
        Rgb::lerp(SCALE_LOW, SCALE_MID, t * 2.0)
    } else {
        Rgb::lerp(SCALE_MID, SCALE_HIGH, (t - 0.5) * 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBucket {
    pub key: BucketKey,
    pub label: String,
    pub win_percentage: f64,
    pub total_trades: usize,
    /// Win percentage rescaled to [0, 1] against this batch.
    pub normalized_score: f64,
}

impl RankedBucket {
    pub fn color(&self) -> Rgb {
        score_color(self.normalized_score)
    }
}

/// Score for buckets that carry no ranking signal.
pub const NEUTRAL_SCORE: f64 = 0.5;

pub struct WinRateRanker;

impl WinRateRanker {
    /// Annotate buckets with a min-max score, keeping bucket-axis order.
    ///
    /// The range comes from buckets that have trades. Buckets without trades
    /// score [`NEUTRAL_SCORE`], as does every bucket when the traded rates
    /// are all equal.
    pub fn rank(summaries: &BTreeMap<BucketKey, BucketSummary>) -> Vec<RankedBucket> {
        let (min, max) = summaries
            .values()
            .filter(|s| s.total_trades > 0)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.win_percentage), hi.max(s.win_percentage))
            });
        let spread = max - min;

        summaries
            .iter()
            .map(|(key, s)| {
                let normalized_score = if s.total_trades > 0 && spread > 0.0 {
                    (s.win_percentage - min) / spread
                } else {
                    NEUTRAL_SCORE
                };
                RankedBucket {
                    key: *key,
                    label: key.label(),
                    win_percentage: s.win_percentage,
                    total_trades: s.total_trades,
                    normalized_score,
                }
            })
            .collect()
    }
}

pub mod aggregator;
pub mod balance;
pub mod bucketer;
pub mod calendar;
pub mod ranker;

pub use aggregator::{Aggregation, Aggregator, BucketSummary};
pub use balance::{BalancePoint, BalanceSeries, BalanceSummary};
pub use bucketer::{BucketScheme, TimeBucketer};
pub use calendar::{CalendarCell, CalendarFiller, CalendarGrid, DailyPnl, DenseDailySeries, Tone};
pub use ranker::{score_color, RankedBucket, Rgb, WinRateRanker, NEUTRAL_SCORE};

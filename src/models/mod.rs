pub mod bucket;
pub mod trade_record;

pub use bucket::{BucketKey, HourOfDay, NightBlock, TimeBlock};
pub use trade_record::{decode_payload, TradeBatch, TradeRecord};

pub mod file;
pub mod http;

pub use file::FileTradeSource;
pub use http::HttpTradeSource;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::models::{decode_payload, TradeBatch};

/// Where trade payloads come from. Implementations return the raw JSON so
/// every source goes through the same validation.
#[async_trait]
pub trait TradeSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch_payload(&mut self) -> Result<Value>;
}

/// Fetch one payload and decode it into a batch.
pub async fn fetch_batch(source: &mut dyn TradeSource) -> Result<TradeBatch> {
    info!("Fetching trades from {}", source.describe());
    let payload = source.fetch_payload().await?;
    let batch = decode_payload(payload)?;
    info!(
        "Received {} trades ({} rejected)",
        batch.len(),
        batch.rejected.len()
    );
    Ok(batch)
}

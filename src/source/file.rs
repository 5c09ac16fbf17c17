use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};
use crate::source::TradeSource;

/// Replays a payload saved to disk, e.g. a previous endpoint response.
pub struct FileTradeSource {
    path: PathBuf,
}

impl FileTradeSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl TradeSource for FileTradeSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_payload(&mut self) -> Result<Value> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ReportError::UpstreamFetch(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ReportError::UpstreamFetch(format!("{} is not JSON: {}", self.path.display(), e))
        })
    }
}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{ReportError, Result};
use crate::source::TradeSource;

/// Client for the trade-data endpoint. A GET with no parameters returns
/// every trade; `date=YYYY-MM-DD` narrows it to one trade day.
pub struct HttpTradeSource {
    client: Client,
    endpoint: String,
    trade_date: Option<String>,
}

impl HttpTradeSource {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .map_err(|e| ReportError::UpstreamFetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: cfg.api_endpoint.clone(),
            trade_date: cfg.trade_date.clone(),
        })
    }
}

#[async_trait]
impl TradeSource for HttpTradeSource {
    fn describe(&self) -> String {
        match &self.trade_date {
            Some(d) => format!("{} (date {})", self.endpoint, d),
            None => self.endpoint.clone(),
        }
    }

    async fn fetch_payload(&mut self) -> Result<Value> {
        let mut req = self.client.get(&self.endpoint);
        if let Some(date) = &self.trade_date {
            req = req.query(&[("date", date.as_str())]);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ReportError::UpstreamFetch(format!("request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ReportError::UpstreamFetch(format!("failed to read body: {}", e)))?;
        debug!("Endpoint answered {} with {} bytes", status, body.len());

        interpret_response(status, &body)
    }
}

/// Map a response to its JSON payload or an upstream failure.
fn interpret_response(status: StatusCode, body: &str) -> Result<Value> {
    let parsed = serde_json::from_str::<Value>(body);

    if !status.is_success() {
        // The endpoint reports its own failures as {"error": ...}
        let detail = parsed
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
            })
            .unwrap_or_else(|| body.trim().to_string());
        return Err(ReportError::UpstreamFetch(format!("HTTP {}: {}", status, detail)));
    }

    parsed.map_err(|e| ReportError::UpstreamFetch(format!("response is not JSON: {}", e)))
}

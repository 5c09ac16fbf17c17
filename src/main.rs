use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use trade_recap::config::Config;
use trade_recap::reporting::ReportRunner;
use trade_recap::source::HttpTradeSource;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let mut source = HttpTradeSource::new(&cfg)?;
    let data_dir = cfg.data_dir.clone();
    let runner = ReportRunner::new(cfg);

    let ctx = match runner.fetch_and_run(&mut source).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("No report generated: {}", e);
            return Err(e.into());
        }
    };

    ctx.print_summary();

    let path = ctx.write_export(&data_dir)?;
    info!("Report saved to: {}", path.display());

    Ok(())
}

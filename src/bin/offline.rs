use anyhow::{bail, Result};
use tracing_subscriber::{fmt, EnvFilter};

use trade_recap::config::Config;
use trade_recap::reporting::ReportRunner;
use trade_recap::source::FileTradeSource;

/// Build the reports from a payload saved on disk.
///
/// Usage: offline <payload.json> [output dir]
#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(payload_path) = args.get(1) else {
        bail!("usage: offline <payload.json> [output dir]");
    };
    let out_dir = args.get(2).cloned().unwrap_or_else(|| cfg.data_dir.clone());

    println!("Payload:     {}", payload_path);
    println!("Balance:     ${:.2}", cfg.starting_balance);
    println!(
        "Timezones:   hourly {} | time blocks {} (night {})",
        cfg.hourly_timezone.name(),
        cfg.time_block_timezone.name(),
        cfg.night_block
    );

    let mut source = FileTradeSource::new(payload_path);
    let runner = ReportRunner::new(cfg);
    let ctx = runner.fetch_and_run(&mut source).await?;

    ctx.print_summary();

    let path = ctx.write_export(&out_dir)?;
    println!("\nReport saved to: {}", path.display());

    Ok(())
}

pub mod report;
pub mod runner;

pub use report::{BalanceReport, DailyReport, DailyRow, ReportContext, WinRateReport, WinRateRow};
pub use runner::ReportRunner;

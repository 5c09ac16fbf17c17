use thiserror::Error;

/// Errors raised while fetching trades or building a report.
///
/// Cloneable so a [`crate::reporting::ReportContext`] can keep the failure of
/// one report next to the successful results of the others.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error("upstream fetch failed: {0}")]
    UpstreamFetch(String),
    #[error("malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("empty range: {0}")]
    EmptyRange(String),
    #[error("schema mismatch: no record carries `{field}`")]
    SchemaMismatch { field: String },
    #[error("{report} report failed: {source}")]
    ReportFailed {
        report: String,
        source: Box<ReportError>,
    },
}

impl ReportError {
    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::MalformedRecord {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Tag this error with the report it broke.
    pub fn in_report(self, report: &str) -> Self {
        ReportError::ReportFailed {
            report: report.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_failure_names_the_report() {
        let err = ReportError::SchemaMismatch {
            field: "CustomTradeDay".into(),
        }
        .in_report("daily");
        let msg = err.to_string();
        assert!(msg.starts_with("daily report failed"));
        assert!(msg.contains("CustomTradeDay"));
    }

    #[test]
    fn upstream_message_is_verbatim() {
        let err = ReportError::UpstreamFetch("timeout".into());
        assert_eq!(err.to_string(), "upstream fetch failed: timeout");
    }
}

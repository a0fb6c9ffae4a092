use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a pipeline run. Nothing partial is rendered when one of
/// these is returned.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("failed to open '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("input is empty")]
    EmptyInput,

    #[error("input is not valid {encoding}")]
    InvalidEncoding { encoding: &'static str },

    #[error("Invalid encoding value '{0}'. Supported values: 'utf-8' or 'shift_jis'.")]
    UnknownEncoding(String),

    #[error("Invalid compression value '{0}'. Supported values: 'zstd' or NULL/omitted.")]
    UnknownCompression(String),

    #[error("Invalid recent game count {0}. Supported values: 10, 20, 30, 40, 50.")]
    InvalidRecentCount(i64),

    #[error("Invalid value for '{parameter}': expected a JSON array of strings ({source})")]
    InvalidSelection {
        parameter: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Non-fatal diagnostics of one run, reported as one `"; "`-joined string.
#[derive(Debug, Clone, Default)]
pub struct ErrorAccumulator {
    messages: Vec<String>,
}

impl ErrorAccumulator {
    pub fn push(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// `None` when nothing was reported.
    pub fn finish(self) -> Option<String> {
        (!self.messages.is_empty()).then(|| self.messages.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorAccumulator, StatsError};

    fn conversion_error(raw: &str) -> String {
        format!("Conversion error: 対局日時='{raw}' (unrecognized date format)")
    }

    #[test]
    fn test_date_conversion_errors_join_in_row_order() {
        let mut diagnostics = ErrorAccumulator::default();
        diagnostics.push(conversion_error("昨日"));
        diagnostics.push(conversion_error("??"));

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.finish().as_deref(),
            Some(
                "Conversion error: 対局日時='昨日' (unrecognized date format); \
                 Conversion error: 対局日時='??' (unrecognized date format)"
            )
        );
    }

    #[test]
    fn test_clean_date_column_reports_nothing() {
        let diagnostics = ErrorAccumulator::default();
        assert!(diagnostics.is_empty());
        assert_eq!(diagnostics.finish(), None);
    }

    #[test]
    fn test_recent_count_error_lists_supported_values() {
        let message = StatsError::InvalidRecentCount(15).to_string();
        assert!(message.contains("15"));
        assert!(message.contains("10, 20, 30, 40, 50"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = StatsError::Io {
            path: "/data/games.csv".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("failed to open '/data/games.csv'"));
    }
}

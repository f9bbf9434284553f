//! Per-handle model configuration.

use tracing::Level;

/// What `find_all` does when a single row fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowErrorPolicy {
    /// Log the error at `warn` and drop the row; the rest of the batch is kept.
    #[default]
    SkipAndLog,
    /// Abort the fetch with the first decode error.
    FailFast,
}

/// Configuration for a [`Model`](crate::Model) handle.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Bulk-fetch behavior for rows that fail to decode.
    pub row_error_policy: RowErrorPolicy,
    /// Level for rendered-statement events. `None` disables them.
    pub log_level: Option<Level>,
    /// Truncate logged SQL (in bytes, on a char boundary). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            row_error_policy: RowErrorPolicy::default(),
            log_level: Some(Level::DEBUG),
            max_sql_length: Some(200),
        }
    }
}

impl ModelConfig {
    /// Create a new configuration with defaults (skip-and-log, DEBUG, 200 bytes).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_error_policy(mut self, policy: RowErrorPolicy) -> Self {
        self.row_error_policy = policy;
        self
    }

    /// Fail `find_all` on the first row that does not decode.
    pub fn fail_fast(self) -> Self {
        self.with_row_error_policy(RowErrorPolicy::FailFast)
    }

    /// Override the tracing level for statement events.
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Stop emitting statement events.
    pub fn disable_logging(mut self) -> Self {
        self.log_level = None;
        self
    }

    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}

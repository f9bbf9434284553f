//! `tracing` events for statements the model runs.

use tracing::Level;

use crate::config::ModelConfig;

pub(crate) const SQL_TARGET: &str = "tagorm.sql";

/// Truncate SQL to at most `max_bytes`, respecting UTF-8 char boundaries.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(config: &ModelConfig, sql: &str) -> String {
    match config.max_sql_length {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

/// Emit the statement about to be sent to the executor.
pub(crate) fn statement(config: &ModelConfig, op: &'static str, sql: &str, param_count: usize) {
    /// Dispatch a tracing event at a runtime-determined level.
    macro_rules! emit_at_level {
        ($level:expr, $($field:tt)*) => {
            match $level {
                Level::ERROR => tracing::error!($($field)*),
                Level::WARN  => tracing::warn!($($field)*),
                Level::INFO  => tracing::info!($($field)*),
                Level::DEBUG => tracing::debug!($($field)*),
                Level::TRACE => tracing::trace!($($field)*),
            }
        };
    }

    let Some(level) = config.log_level else {
        return;
    };
    let sql = display_sql(config, sql);
    emit_at_level!(level, target: SQL_TARGET, op, param_count, sql = %sql);
}

/// Report a row dropped by a skip-and-log bulk fetch.
pub(crate) fn skipped_row(record: &'static str, index: usize, err: &crate::OrmError) {
    tracing::warn!(target: SQL_TARGET, record, row = index, error = %err, "skipping row that failed to decode");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_sql_bytes("SELECT", 10), "SELECT");
        assert_eq!(truncate_sql_bytes("SELECT", 3), "SEL");
        // 'é' is two bytes; cutting inside it backs off to the boundary.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
    }

    #[test]
    fn display_respects_config() {
        let short = ModelConfig::new().max_sql_length(6);
        assert_eq!(display_sql(&short, "SELECT * FROM t"), "SELECT...");
        let full = ModelConfig::new().no_truncate();
        assert_eq!(display_sql(&full, "SELECT * FROM t"), "SELECT * FROM t");
    }
}

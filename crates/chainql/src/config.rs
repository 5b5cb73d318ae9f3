//! Execution settings.

use std::time::Duration;

/// Options applied when a statement is sent to the database.
///
/// ```
/// use chainql::ExecConfig;
/// use std::time::Duration;
///
/// let config = ExecConfig::new()
///     .timeout(Duration::from_secs(2))
///     .tag("users.deactivate")
///     .require_where(true);
/// assert_eq!(config.tag.as_deref(), Some("users.deactivate"));
/// ```
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Abort with [`SqlError::Timeout`](crate::SqlError::Timeout) after this long.
    pub timeout: Option<Duration>,
    /// Label attached to log events.
    pub tag: Option<String>,
    /// Refuse to run an UPDATE that has no WHERE conditions.
    pub require_where: bool,
    /// Truncate logged SQL to this many bytes. `None` logs it whole.
    pub max_sql_log_len: Option<usize>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            tag: None,
            require_where: false,
            max_sql_log_len: Some(200),
        }
    }
}

impl ExecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn require_where(mut self, require: bool) -> Self {
        self.require_where = require;
        self
    }

    pub fn max_sql_log_len(mut self, len: usize) -> Self {
        self.max_sql_log_len = Some(len);
        self
    }

    pub fn no_truncate(mut self) -> Self {
        self.max_sql_log_len = None;
        self
    }
}

/// Cut `sql` to at most `max` bytes without splitting a character.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql(sql: &str, max: Option<usize>) -> std::borrow::Cow<'_, str> {
    match max {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while !sql.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &sql[..end]).into()
        }
        _ => sql.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive() {
        let config = ExecConfig::default();
        assert!(config.timeout.is_none());
        assert!(!config.require_where);
        assert_eq!(config.max_sql_log_len, Some(200));
        assert!(ExecConfig::new().no_truncate().max_sql_log_len.is_none());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql("UPDATE t", Some(20)), "UPDATE t");
        assert_eq!(truncate_sql("UPDATE t", Some(3)), "UPD...");
        assert_eq!(truncate_sql("SET é", Some(5)), "SET ...");
        assert_eq!(truncate_sql("UPDATE t", None), "UPDATE t");
    }
}

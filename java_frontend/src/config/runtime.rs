// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexicalPreferences {
    /// Whether to count keywords, operators and literals separately
    pub collect_detailed_metrics: bool,

    /// Whether whitespace and comment affiliations count toward metrics
    pub count_affiliations: bool,

    /// Whether to record the longest string and comment seen
    pub track_length_statistics: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            count_affiliations: env_flag(env_vars::LEXICAL_COUNT_AFFILIATIONS, true),
            track_length_statistics: env_flag(env_vars::LEXICAL_TRACK_LENGTHS, false),
            include_position_in_errors: env_flag(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxPreferences {
    /// Log every parenthesis classification decision at debug level
    pub log_paren_classification: bool,

    /// Keep failed attempts in the parser's error history
    pub record_error_history: bool,

    /// Log a summary line for each completed parse
    pub log_parse_summary: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            log_paren_classification: env_flag(env_vars::SYNTAX_LOG_PAREN_CLASSIFICATION, false),
            record_error_history: env_flag(env_vars::SYNTAX_RECORD_ERROR_HISTORY, true),
            log_parse_summary: env_flag(env_vars::SYNTAX_LOG_PARSE_SUMMARY, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Preferred minimum log level. Errors are always logged.
    pub min_log_level: LogLevel,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        use crate::logging::events::LogLevel as Event;
        match self {
            LogLevel::Error => Event::Error,
            LogLevel::Warning => Event::Warning,
            LogLevel::Info => Event::Info,
            LogLevel::Debug => Event::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and the CLI)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "JFRONT_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_COUNT_AFFILIATIONS: &str = "JFRONT_LEXICAL_COUNT_AFFILIATIONS";
    pub const LEXICAL_TRACK_LENGTHS: &str = "JFRONT_LEXICAL_TRACK_LENGTHS";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "JFRONT_LEXICAL_INCLUDE_POSITIONS";

    // Syntax
    pub const SYNTAX_LOG_PAREN_CLASSIFICATION: &str = "JFRONT_SYNTAX_LOG_PAREN_CLASSIFICATION";
    pub const SYNTAX_RECORD_ERROR_HISTORY: &str = "JFRONT_SYNTAX_RECORD_ERROR_HISTORY";
    pub const SYNTAX_LOG_PARSE_SUMMARY: &str = "JFRONT_SYNTAX_LOG_PARSE_SUMMARY";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "JFRONT_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "JFRONT_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "JFRONT_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "JFRONT_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("WARN"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Info < LogLevel::Debug);
    }

    #[test]
    fn test_env_flag_falls_back_on_garbage() {
        std::env::set_var("JFRONT_TEST_GARBAGE_FLAG", "not-a-bool");
        assert!(env_flag("JFRONT_TEST_GARBAGE_FLAG", true));
        assert!(!env_flag("JFRONT_TEST_UNSET_FLAG", false));
    }

    #[test]
    fn test_runtime_config_serializes() {
        let config = RuntimeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("log_paren_classification"));
    }
}

// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

/// How lookup results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("Unknown output format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputPreferences {
    /// Output format for lookup results
    pub format: OutputFormat,

    /// Whether to print the description line when the reference has none
    pub show_empty_descriptions: bool,

    /// Whether to include the SQLSTATE in text output
    pub include_sql_state: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            format: env::var(env_vars::OUTPUT_FORMAT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            show_empty_descriptions: env::var(env_vars::SHOW_EMPTY_DESCRIPTIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            include_sql_state: env::var(env_vars::INCLUDE_SQL_STATE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// User preferred minimum log level, `RUST_LOG` still takes precedence
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Convert to the `log` crate's filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }

    /// Raise the level by `steps` (one per `-v`), saturating at trace
    pub fn raised_by(self, steps: u8) -> Self {
        match (self as u8).saturating_add(steps) {
            0 => LogLevel::Error,
            1 => LogLevel::Warning,
            2 => LogLevel::Info,
            3 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        "trace" | "4" => Some(LogLevel::Trace),
        _ => None,
    }
}

/// Environment variable names for runtime configuration
pub mod env_vars {
    // Output
    pub const OUTPUT_FORMAT: &str = "MYSQL_ERRNUM_OUTPUT_FORMAT";
    pub const SHOW_EMPTY_DESCRIPTIONS: &str = "MYSQL_ERRNUM_SHOW_EMPTY_DESCRIPTIONS";
    pub const INCLUDE_SQL_STATE: &str = "MYSQL_ERRNUM_INCLUDE_SQL_STATE";

    // Logging
    pub const LOGGING_MIN_LEVEL: &str = "MYSQL_ERRNUM_LOG_LEVEL";
}

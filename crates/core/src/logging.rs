//! Logging initialization
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and a formatted
//! output layer. `RUST_LOG` directives are honored on top of the configured
//! level.

use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::{config::LoggingConfig, QuestError, Result};

/// Output format of the log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(QuestError::validation(format!("Unknown log format: {}", other))),
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    /// Whether to include timestamps
    pub with_timestamps: bool,
    /// Whether to include file/line information
    pub with_file_info: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_timestamps: true,
            with_file_info: false,
        }
    }
}

impl TryFrom<&LoggingConfig> for LoggerConfig {
    type Error = QuestError;

    fn try_from(config: &LoggingConfig) -> Result<Self> {
        Ok(Self {
            level: config.level.clone(),
            format: config.format.parse()?,
            with_timestamps: true,
            with_file_info: config.with_file_info,
        })
    }
}

/// Initialize the global logger with the given configuration
///
/// # Errors
///
/// Returns `QuestError::Validation` for an unknown level or when a global
/// subscriber is already installed
pub fn init_logger(config: LoggerConfig) -> Result<()> {
    let level = Level::from_str(&config.level).map_err(|e| {
        QuestError::validation(format!("Invalid log level '{}': {}", config.level, e))
    })?;

    let mut env_filter = EnvFilter::from_default_env().add_directive(level.into());
    for directive in ["hyper=warn", "reqwest=warn", "h2=warn", "sqlx=warn"] {
        let directive = directive
            .parse()
            .map_err(|e| QuestError::validation(format!("Invalid log directive: {}", e)))?;
        env_filter = env_filter.add_directive(directive);
    }

    let fmt_layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_file(config.with_file_info)
            .with_line_number(config.with_file_info)
            .boxed(),
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_target(true)
                .with_file(config.with_file_info)
                .with_line_number(config.with_file_info);

            if config.with_timestamps {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| QuestError::validation(format!("Failed to initialize logger: {}", e)))?;

    tracing::info!("Logger initialized with level: {}", config.level);
    Ok(())
}

/// Initialize logger for testing (reduces noise)
pub fn init_test_logger() {
    let config = LoggerConfig {
        level: "warn".to_string(),
        format: LogFormat::Compact,
        with_timestamps: false,
        with_file_info: false,
    };

    // Ignore errors if already initialized
    let _ = init_logger(config);
}

/// Create a logger configuration from `QUESTSEARCH_LOG_*` variables
pub fn logger_config_from_env() -> LoggerConfig {
    LoggerConfig {
        level: std::env::var("QUESTSEARCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        format: std::env::var("QUESTSEARCH_LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default(),
        with_timestamps: true,
        with_file_info: std::env::var("QUESTSEARCH_LOG_FILE_INFO")
            .map(|v| v.parse().unwrap_or(false))
            .unwrap_or(false),
    }
}

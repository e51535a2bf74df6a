use log::LevelFilter;
use serde::{Deserialize, Serialize};

pub const LOG_LEVELS: [&str; 5] = ["ERROR", "WARN", "INFO", "DEBUG", "TRACE"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,           // "ERROR", "WARN", "INFO", "DEBUG", "TRACE"
    pub console_enabled: bool,   // 是否启用控制台日志
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "WARN".to_string(),
            console_enabled: true,
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.to_ascii_uppercase().as_str() {
            "ERROR" => LevelFilter::Error,
            "WARN" => LevelFilter::Warn,
            "INFO" => LevelFilter::Info,
            "DEBUG" => LevelFilter::Debug,
            "TRACE" => LevelFilter::Trace,
            _ => LevelFilter::Warn,
        }
    }
}

// 在日志消息后附加 key=value 元数据
#[macro_export]
macro_rules! log_with_metadata {
    ($level:ident, $msg:expr) => {
        log::$level!("{}", $msg);
    };
    ($level:ident, $msg:expr, $($key:expr => $value:expr),+) => {
        log::$level!("{} [{}]", $msg,
            vec![$(format!("{}={}", $key, $value)),+].join(", ")
        );
    };
}

/// Installs the console logger. Calling it twice keeps the first logger.
#[cfg(feature = "logging")]
pub fn init_logging(config: &LoggingConfig) {
    if !config.console_enabled {
        log::set_max_level(LevelFilter::Off);
        return;
    }

    // RUST_LOG 优先于配置文件中的级别
    let mut builder = env_logger::Builder::new();
    builder.filter_level(config.level_filter());
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(not(feature = "logging"))]
pub fn init_logging(config: &LoggingConfig) {
    let _ = config;
}

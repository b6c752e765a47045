use std::{env, path::PathBuf, str::FromStr};

use swtcef_chromium::cef::LogSeverity;

#[derive(Debug, Clone)]
pub struct Config {
    pub logger: LoggerConfig,
    pub cache_root: PathBuf,
    pub resources_path: PathBuf,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: String,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub log_severity: LogSeverity,
    pub remote_debugging_port: u16,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoggerFormat {
    Pretty,
    Json,
    Compact,
}

impl FromStr for LoggerFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(LoggerFormat::Json),
            "pretty" => Ok(LoggerFormat::Pretty),
            "compact" => Ok(LoggerFormat::Compact),
            _ => Err("invalid logger format"),
        }
    }
}

pub fn read_config() -> Result<Config, String> {
    let cache_root = match env::var("SWTCEF_CACHE_ROOT") {
        Ok(path) => PathBuf::from(path),
        Err(_) => swtcef_natives::default_cache_root().map_err(|err| err.to_string())?,
    };

    let resources_path = match env::var("SWTCEF_RESOURCES_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("natives")))
            .ok_or("SWTCEF_RESOURCES_PATH is not set and the executable directory is unknown")?,
    };

    let logger_level = match env::var("SWTCEF_LOGGER_LEVEL") {
        Ok(level) => level,
        Err(_) => "info".to_string(),
    };

    // When running from the repo use compact logger
    let default_logger_format = match env::var("CARGO_MANIFEST_DIR") {
        Ok(_) => LoggerFormat::Compact,
        Err(_) => LoggerFormat::Json,
    };
    let logger_format = match env::var("SWTCEF_LOGGER_FORMAT") {
        Ok(format) => LoggerFormat::from_str(&format).unwrap_or(default_logger_format),
        Err(_) => default_logger_format,
    };

    let log_file = env::var("SWTCEF_LOG_FILE").ok().map(PathBuf::from);

    let log_severity = engine_log_severity(env::var("SWTCEF_ENGINE_LOG_SEVERITY").ok())?;

    let remote_debugging_port = match env::var("SWTCEF_REMOTE_DEBUGGING_PORT") {
        Ok(port) => port
            .parse::<u16>()
            .map_err(|_| "SWTCEF_REMOTE_DEBUGGING_PORT has to be valid port number")?,
        Err(_) => 0,
    };

    Ok(Config {
        logger: LoggerConfig {
            format: logger_format,
            level: logger_level,
            log_file,
        },
        cache_root,
        resources_path,
        engine: EngineConfig {
            log_severity,
            remote_debugging_port,
        },
    })
}

fn engine_log_severity(value: Option<String>) -> Result<LogSeverity, String> {
    match value {
        Some(severity) => LogSeverity::from_str(&severity).map_err(|_| {
            format!(
                "SWTCEF_ENGINE_LOG_SEVERITY has to be one of \"default\", \"verbose\", \"info\", \"warning\", \"error\", \"fatal\" or \"disable\", got \"{severity}\""
            )
        }),
        None => Ok(LogSeverity::Info),
    }
}

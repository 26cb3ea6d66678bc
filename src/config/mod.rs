use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::assessment::recommend::DEFAULT_THRESHOLD;

const DEFAULT_HISTORY_PATH: &str = "ffs_history.csv";

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub history: HistoryConfig,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("FFS_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let history_path = env::var("FFS_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_HISTORY_PATH));

        let recommendation_threshold = match env::var("FFS_RECOMMENDATION_THRESHOLD") {
            Ok(raw) => parse_threshold(&raw)?,
            Err(_) => DEFAULT_THRESHOLD,
        };

        let log_level = env::var("FFS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            history: HistoryConfig { path: history_path },
            scoring: ScoringConfig {
                recommendation_threshold,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidThreshold {
            value: raw.to_string(),
        })?;
    if !value.is_finite() || value <= 0.0 || value > 10.0 {
        return Err(ConfigError::InvalidThreshold {
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// Location of the append-only assessment log.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub path: PathBuf,
}

/// Knobs the scoring pipeline reads at startup.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub recommendation_threshold: f64,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidThreshold { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidThreshold { value } => {
                write!(
                    f,
                    "FFS_RECOMMENDATION_THRESHOLD must be a finite number in (0, 10], got '{value}'"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("FFS_ENV");
        env::remove_var("FFS_HISTORY_PATH");
        env::remove_var("FFS_RECOMMENDATION_THRESHOLD");
        env::remove_var("FFS_LOG_LEVEL");
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let _lock = env_guard().lock().expect("env guard");
        reset_env();

        let config = AppConfig::load().expect("defaults load");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.history.path, PathBuf::from(DEFAULT_HISTORY_PATH));
        assert_eq!(config.scoring.recommendation_threshold, DEFAULT_THRESHOLD);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn env_overrides_are_honored() {
        let _lock = env_guard().lock().expect("env guard");
        reset_env();
        env::set_var("FFS_ENV", "production");
        env::set_var("FFS_HISTORY_PATH", "/tmp/ffs/history.csv");
        env::set_var("FFS_RECOMMENDATION_THRESHOLD", "6.5");
        env::set_var("FFS_LOG_LEVEL", "debug");

        let config = AppConfig::load().expect("overrides load");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.history.path, PathBuf::from("/tmp/ffs/history.csv"));
        assert_eq!(config.scoring.recommendation_threshold, 6.5);
        assert_eq!(config.telemetry.log_level, "debug");

        reset_env();
    }

    #[test]
    fn threshold_outside_the_scale_is_rejected() {
        let _lock = env_guard().lock().expect("env guard");
        reset_env();
        env::set_var("FFS_RECOMMENDATION_THRESHOLD", "12");

        let err = AppConfig::load().expect_err("12 is off the scale");
        assert!(matches!(err, ConfigError::InvalidThreshold { .. }));

        reset_env();
    }

    #[test]
    fn threshold_must_be_numeric() {
        let _lock = env_guard().lock().expect("env guard");
        reset_env();
        env::set_var("FFS_RECOMMENDATION_THRESHOLD", "strict");

        let err = AppConfig::load().expect_err("not a number");
        assert!(matches!(err, ConfigError::InvalidThreshold { .. }));

        reset_env();
    }
}

//! Signal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SIGNALS_VELOCITY_WINDOW_DAYS` - Trailing velocity window (default: 7)
//! - `SIGNALS_REFILL_COVER_DAYS` - Days of demand a refill covers (default: 7)
//! - `SIGNALS_HIGH_PRIORITY_DAYS` - Max stockout days for HIGH (default: 3)
//! - `SIGNALS_MEDIUM_PRIORITY_DAYS` - Max stockout days for MEDIUM (default: 7)
//! - `SIGNALS_TREND_THRESHOLD_PERCENT` - Growth threshold for RISING/FALLING (default: 10)
//! - `SIGNALS_TOP_N` - Products returned by trend analysis (default: 5)
//! - `SIGNALS_PERIOD_DAYS` - Trend window length (default: 7)
//! - `SIGNALS_TODAY` - Pin the stockout projection date (YYYY-MM-DD, default: wall clock)

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::forecast::{ForecastConfig, PriorityThresholds, VelocityReference};
use crate::trends::TrendConfig;

const DEFAULT_TOP_N: usize = 5;
const DEFAULT_PERIOD_DAYS: u32 = 7;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Settings for a signals run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalsConfig {
    /// Replenishment forecaster settings
    pub forecast: ForecastConfig,
    /// Trend analyzer settings
    pub trends: TrendConfig,
    /// Products returned by trend analysis
    pub top_n: usize,
    /// Trend window length in days
    pub period_days: u32,
    /// Pinned "today" for stockout projection; wall clock when unset
    pub today: Option<NaiveDate>,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            forecast: ForecastConfig::default(),
            trends: TrendConfig::default(),
            top_n: DEFAULT_TOP_N,
            period_days: DEFAULT_PERIOD_DAYS,
            today: None,
        }
    }
}

impl SignalsConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed or
    /// is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`SignalsConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env = EnvReader { lookup };

        let velocity_window_days = env.positive(
            "SIGNALS_VELOCITY_WINDOW_DAYS",
            defaults.forecast.velocity_window_days,
        )?;
        let refill_cover_days =
            env.positive("SIGNALS_REFILL_COVER_DAYS", defaults.forecast.refill_cover_days)?;

        let default_thresholds = defaults.forecast.priority_thresholds;
        let high_max_days =
            env.parsed("SIGNALS_HIGH_PRIORITY_DAYS", default_thresholds.high_max_days)?;
        let medium_max_days =
            env.parsed("SIGNALS_MEDIUM_PRIORITY_DAYS", default_thresholds.medium_max_days)?;
        if medium_max_days < high_max_days {
            return Err(ConfigError::InvalidEnvVar(
                "SIGNALS_MEDIUM_PRIORITY_DAYS".to_string(),
                format!("must be at least SIGNALS_HIGH_PRIORITY_DAYS ({high_max_days})"),
            ));
        }

        let threshold_percent: Decimal = env.parsed(
            "SIGNALS_TREND_THRESHOLD_PERCENT",
            defaults.trends.threshold_percent,
        )?;
        if threshold_percent.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "SIGNALS_TREND_THRESHOLD_PERCENT".to_string(),
                "must not be negative".to_string(),
            ));
        }

        let top_n = env.parsed("SIGNALS_TOP_N", defaults.top_n)?;
        let period_days = env.positive("SIGNALS_PERIOD_DAYS", defaults.period_days)?;
        let today = env.date("SIGNALS_TODAY")?;

        Ok(Self {
            forecast: ForecastConfig {
                velocity_window_days,
                refill_cover_days,
                priority_thresholds: PriorityThresholds {
                    high_max_days,
                    medium_max_days,
                },
                reference: VelocityReference::LatestSale,
            },
            trends: TrendConfig { threshold_percent },
            top_n,
            period_days,
            today,
        })
    }
}

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key).map_or(Ok(default), |value| {
            value
                .parse()
                .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    fn positive(&self, key: &str, default: u32) -> Result<u32, ConfigError> {
        let value = self.parsed(key, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        Ok(value)
    }

    fn date(&self, key: &str) -> Result<Option<NaiveDate>, ConfigError> {
        self.get(key)
            .map(|value| {
                NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }
}

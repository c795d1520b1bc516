//! Dashboard settings: coin set, colors, display widths and where they live on disk.
//!
//! Settings are read once at startup from `coinmonitor_config.json`. When the file does not
//! exist a default one is written so the user has something to edit.

use crate::{error::MonitorError, snapshot::MAX_PAIRS};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    fs::OpenOptions,
    io::{ErrorKind, Write},
    ops::RangeInclusive,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{info, warn};

/// Default exchange-rate endpoint, the coin symbol is appended to it.
pub const DEFAULT_API: &str = "https://api.coinbase.com/v2/exchange-rates?currency=";

/// Accepted decimal digits of a rate.
pub const RATE_PRECISION_RANGE: RangeInclusive<usize> = 9..=10;

/// Accepted per-request timeout in seconds.
pub const TIMEOUT_SECS_RANGE: RangeInclusive<u64> = 5..=10;

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "coinmonitor_config.json";

/// Persisted baseline file name inside the config directory.
pub const BASELINE_FILE: &str = "start_rates.json";

/// Get config directory from COIN_MONITOR_CONFIG_DIR env var (default: config_files)
pub fn config_dir() -> PathBuf {
    std::env::var("COIN_MONITOR_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config_files"))
}

/// Terminal color names accepted in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayColor {
    Black,
    Blue,
    Cyan,
    Green,
    Magenta,
    Red,
    White,
    Yellow,
}

impl DisplayColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayColor::Black => "BLACK",
            DisplayColor::Blue => "BLUE",
            DisplayColor::Cyan => "CYAN",
            DisplayColor::Green => "GREEN",
            DisplayColor::Magenta => "MAGENTA",
            DisplayColor::Red => "RED",
            DisplayColor::White => "WHITE",
            DisplayColor::Yellow => "YELLOW",
        }
    }
}

impl std::fmt::Display for DisplayColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quote currency and colors for one configured coin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CoinConfig {
    /// Quote currency code looked up in the API's `rates` map (e.g. "USDT")
    pub currency: String,
    /// Color of the coin symbol
    pub coin_color: DisplayColor,
    /// Color of the currency code
    pub currency_color: DisplayColor,
}

impl CoinConfig {
    pub fn new(
        currency: impl Into<String>,
        coin_color: DisplayColor,
        currency_color: DisplayColor,
    ) -> Self {
        Self {
            currency: currency.into(),
            coin_color,
            currency_color,
        }
    }
}

/// Precision and field widths used when rendering a row.
///
/// Every field has a default, so a settings file may omit `display` entirely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal digits of a formatted rate
    pub rate_precision: usize,
    /// Decimal digits of a percentage change
    pub percent_precision: usize,
    /// Width reserved for the "COIN/CUR:" label
    pub coin_width: usize,
    /// Width of the rate field
    pub rate_width: usize,
    /// Maximum width of a non-negative percentage
    pub percent_width: usize,
    /// Gap between the end of the rate field and the percentage
    pub percent_gap: usize,
    /// Maximum characters of a coin symbol before it is clamped
    pub coin_len: usize,
    /// Maximum characters of a currency code before it is clamped
    pub currency_len: usize,
    /// Delay between refresh cycles in milliseconds
    pub refresh_ms: u64,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rate_precision: 10,
            percent_precision: 4,
            coin_width: 11,
            rate_width: 11,
            percent_width: 7,
            percent_gap: 4,
            coin_len: 5,
            currency_len: 4,
            refresh_ms: 500,
            timeout_secs: 5,
        }
    }
}

impl DisplayConfig {
    /// Set rate precision
    pub fn with_rate_precision(mut self, precision: usize) -> Self {
        self.rate_precision = precision;
        self
    }

    /// Set percentage precision
    pub fn with_percent_precision(mut self, precision: usize) -> Self {
        self.percent_precision = precision;
        self
    }

    /// Set refresh interval
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_ms = interval.as_millis() as u64;
        self
    }

    /// Placeholder rate shown when a coin is unavailable, as wide as a real rate below 10.
    pub fn zero_value(&self) -> String {
        format!("{:.*}", self.rate_precision, 0.0)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete dashboard settings as stored in `coinmonitor_config.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Exchange-rate endpoint, the coin symbol is appended
    #[serde(rename = "API")]
    pub api: String,
    /// Color of the '/' and ':' marks between symbol, currency and rate
    pub marks_color: DisplayColor,
    /// Show the info panel instead of rates
    #[serde(default)]
    pub info: bool,
    /// Color of the info panel text
    #[serde(default = "default_info_color")]
    pub info_color: DisplayColor,
    /// Coins in display order
    pub coins: IndexMap<String, CoinConfig>,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_info_color() -> DisplayColor {
    DisplayColor::Magenta
}

impl Default for Settings {
    fn default() -> Self {
        let coins = ["BTC", "ETH", "XRP", "LTC", "BNB", "SOL"]
            .into_iter()
            .map(|symbol| {
                (
                    symbol.to_string(),
                    CoinConfig::new("USDT", DisplayColor::Blue, DisplayColor::Cyan),
                )
            })
            .collect();

        Self {
            api: DEFAULT_API.to_string(),
            marks_color: DisplayColor::Magenta,
            info: false,
            info_color: default_info_color(),
            coins,
            display: DisplayConfig::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON text and validate them.
    pub fn from_json(text: &str) -> Result<Self, MonitorError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from `dir`, writing and returning the defaults if the file is missing.
    pub fn load_or_init(dir: &Path) -> Result<Self, MonitorError> {
        let path = dir.join(SETTINGS_FILE);

        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_json(&text).map_err(|error| match error {
                MonitorError::Config(msg) => {
                    MonitorError::Config(format!("{} is malformed: {}", path.display(), msg))
                }
                other => other,
            }),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                let settings = Settings::default();
                std::fs::create_dir_all(dir)?;
                write_new_json(&path, &settings)?;
                info!("Wrote default settings to {}", path.display());
                Ok(settings)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Check the settings can drive a dashboard.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.coins.len() > MAX_PAIRS {
            return Err(MonitorError::TooManyPairs {
                count: self.coins.len(),
                max: MAX_PAIRS,
            });
        }
        if self.api.trim().is_empty() {
            return Err(MonitorError::Config("API base URL is empty".to_string()));
        }
        self.display.validate()
    }
}

impl DisplayConfig {
    /// Check every display parameter is within its working range.
    pub fn validate(&self) -> Result<(), MonitorError> {
        if !RATE_PRECISION_RANGE.contains(&self.rate_precision) {
            return Err(MonitorError::Config(format!(
                "display.rate_precision must be within {}..={}, got {}",
                RATE_PRECISION_RANGE.start(),
                RATE_PRECISION_RANGE.end(),
                self.rate_precision
            )));
        }
        if !TIMEOUT_SECS_RANGE.contains(&self.timeout_secs) {
            return Err(MonitorError::Config(format!(
                "display.timeout_secs must be within {}..={}, got {}",
                TIMEOUT_SECS_RANGE.start(),
                TIMEOUT_SECS_RANGE.end(),
                self.timeout_secs
            )));
        }
        if self.refresh_ms == 0 {
            return Err(MonitorError::Config(
                "display.refresh_ms must be at least 1".to_string(),
            ));
        }

        let widths = [
            ("coin_width", self.coin_width),
            ("rate_width", self.rate_width),
            ("percent_width", self.percent_width),
            ("coin_len", self.coin_len),
            ("currency_len", self.currency_len),
        ];
        if let Some((name, _)) = widths.iter().find(|(_, width)| *width == 0) {
            return Err(MonitorError::Config(format!(
                "display.{} must be at least 1",
                name
            )));
        }
        Ok(())
    }
}

/// Write `value` as pretty JSON, leaving an existing file untouched.
pub(crate) fn write_new_json<T: Serialize>(path: &Path, value: &T) -> Result<(), MonitorError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::AlreadyExists => {
            warn!("{} already exists, not overwriting", path.display());
            return Ok(());
        }
        Err(error) => return Err(error.into()),
    };
    let text = serde_json::to_string_pretty(value)?;
    file.write_all(text.as_bytes())?;
    Ok(())
}

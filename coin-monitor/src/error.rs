use thiserror::Error;

/// All errors generated in `coin-monitor`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("too many coin pairs configured: {count} (maximum {max})")]
    TooManyPairs { count: usize, max: usize },

    #[error("stored baseline has {stored} rates but {coins} coins are configured")]
    BaselineMismatch { stored: usize, coins: usize },

    #[error("baseline rate for coin #{index} is zero, percentage change is undefined")]
    ZeroBaseline { index: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl MonitorError {
    /// Determine if an error only affects the current refresh cycle.
    ///
    /// Everything else is a cardinality or storage fault that should halt the dashboard.
    #[allow(clippy::match_like_matches_macro)]
    pub fn is_recoverable(&self) -> bool {
        match self {
            MonitorError::ZeroBaseline { .. } => true,
            _ => false,
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

/// Errors raised by a terminal [`Surface`](crate::dashboard::Surface).
///
/// Kept apart from [`MonitorError`] since a failed draw never stops the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("draw outside visible region at row {row}, column {col}")]
    OutOfBounds { row: u16, col: u16 },

    #[error("terminal I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for SurfaceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

/// Coin Monitor - Core Library
///
/// Polls a public exchange-rate API for a configured list of coin/currency pairs and renders
/// them as color-coded columns through a [`Surface`]:
/// - settings: JSON settings file, created with defaults on first run
/// - client: HTTP rate lookups that degrade to "unavailable" instead of failing
/// - snapshot: one concurrent fetch round over every configured pair
/// - history: persisted baseline rates and previous-cycle rates
/// - layout: up to three columns depending on terminal width
/// - dashboard: the refresh loop tying it together
pub mod baseline;
pub mod client;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod history;
pub mod layout;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use baseline::{BaselineStore, JsonBaselineStore, MemoryBaselineStore};
pub use client::{HttpRateClient, RateClient, RateClientConfig};
pub use config::{CoinConfig, DisplayColor, DisplayConfig, Settings};
pub use dashboard::{CancelSignal, CycleReport, Dashboard, DashboardState, Surface};
pub use error::{MonitorError, SurfaceError};
pub use history::RateHistory;
pub use layout::{Layout, Placement, place_rows};
pub use snapshot::{MAX_PAIRS, RateEntry, Snapshot, SnapshotBuilder};

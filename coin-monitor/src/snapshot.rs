//! Fan-out/fan-in of one refresh cycle: every configured coin is fetched concurrently and the
//! results are joined back into a snapshot in configuration order.

use crate::{
    client::RateClient,
    config::{CoinConfig, DisplayColor, DisplayConfig},
    error::MonitorError,
};
use futures::future::join_all;
use indexmap::IndexMap;
use tracing::debug;

/// Hard cap on coins per cycle (one concurrent request each).
pub const MAX_PAIRS: usize = 75;

/// One coin's observation in a single refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub symbol: String,
    pub currency: String,
    /// Rate with fixed decimal precision, or the zero-value placeholder
    pub rate: String,
    pub coin_color: DisplayColor,
    pub currency_color: DisplayColor,
    pub available: bool,
}

impl RateEntry {
    /// Numeric rate; the unavailable placeholder reads as `0.0`.
    pub fn value(&self) -> f64 {
        self.rate.parse().unwrap_or(0.0)
    }

    pub fn is_available(&self) -> bool {
        self.available
    }
}

/// Ordered rate entries for one cycle, index `i` always being the `i`-th configured coin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    entries: Vec<RateEntry>,
}

impl Snapshot {
    pub fn new(entries: Vec<RateEntry>) -> Result<Self, MonitorError> {
        if entries.len() > MAX_PAIRS {
            return Err(MonitorError::TooManyPairs {
                count: entries.len(),
                max: MAX_PAIRS,
            });
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RateEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RateEntry> {
        self.entries.iter()
    }

    /// Numeric rates in coin order.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(RateEntry::value).collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a RateEntry;
    type IntoIter = std::slice::Iter<'a, RateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds a [`Snapshot`] per cycle from a [`RateClient`].
#[derive(Debug)]
pub struct SnapshotBuilder<C> {
    client: C,
    display: DisplayConfig,
}

impl<C> SnapshotBuilder<C>
where
    C: RateClient,
{
    pub fn new(client: C, display: DisplayConfig) -> Self {
        Self { client, display }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch every coin concurrently and wait for all of them.
    ///
    /// A slow or failing coin only delays or blanks its own entry.
    pub async fn build(
        &self,
        coins: &IndexMap<String, CoinConfig>,
    ) -> Result<Snapshot, MonitorError> {
        if coins.len() > MAX_PAIRS {
            return Err(MonitorError::TooManyPairs {
                count: coins.len(),
                max: MAX_PAIRS,
            });
        }

        let rates = join_all(
            coins
                .iter()
                .map(|(symbol, coin)| self.client.fetch(symbol, &coin.currency)),
        )
        .await;

        let zero_value = self.display.zero_value();
        let entries: Vec<RateEntry> = coins
            .iter()
            .zip(rates)
            .map(|((symbol, coin), rate)| RateEntry {
                symbol: symbol.clone(),
                currency: coin.currency.clone(),
                rate: rate
                    .map(|value| format!("{:.*}", self.display.rate_precision, value))
                    .unwrap_or_else(|| zero_value.clone()),
                coin_color: coin.coin_color,
                currency_color: coin.currency_color,
                available: rate.is_some(),
            })
            .collect();

        debug!(
            total = entries.len(),
            available = entries.iter().filter(|entry| entry.available).count(),
            "Built rate snapshot"
        );

        Snapshot::new(entries)
    }
}

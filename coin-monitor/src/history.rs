//! Baseline and previous-cycle rates, and percentage change against the baseline.

use crate::{baseline::BaselineStore, error::MonitorError, snapshot::Snapshot};
use tracing::{info, warn};

/// Rate history of the running dashboard.
///
/// The baseline is set once, from storage or from the first snapshot, and is only
/// recomputed after [`RateHistory::invalidate_baseline`]. Previous rates follow the last
/// rendered cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateHistory {
    baseline: Vec<f64>,
    previous: Vec<f64>,
    established: bool,
    reset_pending: bool,
    percent_precision: usize,
}

impl RateHistory {
    pub fn new(percent_precision: usize) -> Self {
        Self {
            percent_precision,
            ..Default::default()
        }
    }

    /// Establish the baseline if it is not set.
    ///
    /// On first use a stored baseline is restored (its length must match the snapshot),
    /// otherwise the snapshot itself becomes the baseline and is stored. After a reset the
    /// live snapshot always wins and replaces whatever is stored.
    pub fn ensure_baseline(
        &mut self,
        snapshot: &Snapshot,
        store: &mut dyn BaselineStore,
    ) -> Result<(), MonitorError> {
        if self.established {
            return Ok(());
        }

        if self.reset_pending {
            self.baseline = snapshot.values();
            store.replace(&self.baseline)?;
            info!(coins = self.baseline.len(), "Recomputed baseline from live rates");
        } else {
            match store.load()? {
                Some(stored) => {
                    if stored.len() != snapshot.len() {
                        return Err(MonitorError::BaselineMismatch {
                            stored: stored.len(),
                            coins: snapshot.len(),
                        });
                    }
                    self.baseline = stored;
                    info!(coins = self.baseline.len(), "Restored stored baseline");
                }
                None => {
                    self.baseline = snapshot.values();
                    store.save(&self.baseline)?;
                    info!(coins = self.baseline.len(), "Established baseline");
                }
            }
        }

        self.established = true;
        self.reset_pending = false;
        Ok(())
    }

    /// Reset previous rates to zeros when the coin count changed. Returns true if reset.
    pub fn ensure_previous_len(&mut self, len: usize) -> bool {
        if self.previous.len() == len {
            return false;
        }
        self.previous = vec![0.0; len];
        true
    }

    /// Percentage change of `current` against the baseline of coin `index`.
    pub fn percent_change(&self, index: usize, current: f64) -> Result<String, MonitorError> {
        let base = self.baseline(index);
        if base == 0.0 {
            return Err(MonitorError::ZeroBaseline { index });
        }
        let difference = (current - base) / base.abs() * 100.0;
        Ok(format!("{:.*}%", self.percent_precision, difference))
    }

    /// Drop the baseline so the next cycle recomputes it from live data.
    pub fn invalidate_baseline(&mut self) {
        if self.established {
            warn!("Baseline invalidated, recomputing on next cycle");
        }
        self.established = false;
        self.reset_pending = true;
    }

    pub fn record_previous(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.previous.get_mut(index) {
            *slot = value;
        }
    }

    pub fn previous(&self, index: usize) -> f64 {
        self.previous.get(index).copied().unwrap_or(0.0)
    }

    pub fn baseline(&self, index: usize) -> f64 {
        self.baseline.get(index).copied().unwrap_or(0.0)
    }

    pub fn baseline_rates(&self) -> &[f64] {
        &self.baseline
    }

    pub fn previous_rates(&self) -> &[f64] {
        &self.previous
    }

    pub fn has_baseline(&self) -> bool {
        self.established
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        baseline::MemoryBaselineStore,
        config::DisplayColor,
        snapshot::RateEntry,
    };

    fn snapshot(values: &[f64]) -> Snapshot {
        let entries = values
            .iter()
            .enumerate()
            .map(|(index, value)| RateEntry {
                symbol: format!("C{}", index),
                currency: "USDT".to_string(),
                rate: format!("{:.10}", value),
                coin_color: DisplayColor::Blue,
                currency_color: DisplayColor::Cyan,
                available: true,
            })
            .collect();
        Snapshot::new(entries).unwrap()
    }

    #[test]
    fn test_percent_change() {
        let mut history = RateHistory::new(4);
        let mut store = MemoryBaselineStore::new();
        history
            .ensure_baseline(&snapshot(&[100.0, -50.0]), &mut store)
            .unwrap();

        assert_eq!(history.percent_change(0, 110.0).unwrap(), "10.0000%");
        assert_eq!(history.percent_change(0, 90.0).unwrap(), "-10.0000%");
        // Negative baseline uses its magnitude as denominator
        assert_eq!(history.percent_change(1, -25.0).unwrap(), "50.0000%");
    }

    #[test]
    fn test_percent_change_precision() {
        let mut history = RateHistory::new(3);
        let mut store = MemoryBaselineStore::new();
        history
            .ensure_baseline(&snapshot(&[3.0]), &mut store)
            .unwrap();
        assert_eq!(history.percent_change(0, 4.0).unwrap(), "33.333%");
    }

    #[test]
    fn test_percent_change_zero_baseline() {
        let mut history = RateHistory::new(4);
        let mut store = MemoryBaselineStore::new();
        history
            .ensure_baseline(&snapshot(&[0.0, 5.0]), &mut store)
            .unwrap();

        assert_eq!(
            history.percent_change(0, 123.0),
            Err(MonitorError::ZeroBaseline { index: 0 })
        );
        assert!(history.percent_change(1, 5.0).is_ok());
    }

    #[test]
    fn test_baseline_set_once() {
        let mut history = RateHistory::new(4);
        let mut store = MemoryBaselineStore::new();

        history
            .ensure_baseline(&snapshot(&[100.0, 200.0, 300.0]), &mut store)
            .unwrap();
        history
            .ensure_baseline(&snapshot(&[1.0, 2.0, 3.0]), &mut store)
            .unwrap();

        assert_eq!(history.baseline_rates(), &[100.0, 200.0, 300.0]);
        assert_eq!(store.rates(), Some(&[100.0, 200.0, 300.0][..]));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_baseline_restored_from_store() {
        let mut history = RateHistory::new(4);
        let mut store = MemoryBaselineStore::with_rates(vec![90.0, 180.0]);

        history
            .ensure_baseline(&snapshot(&[100.0, 200.0]), &mut store)
            .unwrap();

        assert!(history.has_baseline());
        assert_eq!(history.baseline_rates(), &[90.0, 180.0]);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_baseline_store_length_mismatch() {
        let mut history = RateHistory::new(4);
        let mut store = MemoryBaselineStore::with_rates(vec![90.0, 180.0]);

        assert_eq!(
            history.ensure_baseline(&snapshot(&[1.0, 2.0, 3.0]), &mut store),
            Err(MonitorError::BaselineMismatch { stored: 2, coins: 3 })
        );
        assert!(!history.has_baseline());
    }

    #[test]
    fn test_invalidate_recomputes_from_live_data() {
        let mut history = RateHistory::new(4);
        let mut store = MemoryBaselineStore::with_rates(vec![0.0, 10.0]);

        history
            .ensure_baseline(&snapshot(&[5.0, 11.0]), &mut store)
            .unwrap();
        assert!(history.percent_change(0, 5.0).is_err());

        history.invalidate_baseline();
        assert!(!history.has_baseline());

        history
            .ensure_baseline(&snapshot(&[5.0, 11.0]), &mut store)
            .unwrap();
        assert_eq!(history.baseline_rates(), &[5.0, 11.0]);
        assert_eq!(store.rates(), Some(&[5.0, 11.0][..]));
        assert_eq!(history.percent_change(0, 5.5).unwrap(), "10.0000%");
    }

    #[test]
    fn test_previous_len_reset() {
        let mut history = RateHistory::new(4);

        assert!(history.ensure_previous_len(3));
        assert_eq!(history.previous_rates(), &[0.0, 0.0, 0.0]);

        history.record_previous(0, 1.5);
        history.record_previous(2, 3.5);
        assert!(!history.ensure_previous_len(3));
        assert_eq!(history.previous_rates(), &[1.5, 0.0, 3.5]);

        // Coin added: everything re-zeroed
        assert!(history.ensure_previous_len(4));
        assert_eq!(history.previous_rates(), &[0.0, 0.0, 0.0, 0.0]);

        // Coin removed
        history.record_previous(1, 9.0);
        assert!(history.ensure_previous_len(2));
        assert_eq!(history.previous_rates(), &[0.0, 0.0]);
    }

    #[test]
    fn test_record_previous_out_of_range_ignored() {
        let mut history = RateHistory::new(4);
        history.ensure_previous_len(1);
        history.record_previous(5, 1.0);
        assert_eq!(history.previous_rates(), &[0.0]);
        assert_eq!(history.previous(5), 0.0);
    }
}

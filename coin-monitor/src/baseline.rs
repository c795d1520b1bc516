//! Persistence of the baseline ("start") rates between runs.

use crate::{config::write_new_json, error::MonitorError};
use serde::{Deserialize, Serialize};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Storage for the baseline rates, one value per configured coin in configuration order.
pub trait BaselineStore {
    /// Stored baseline, or `None` if nothing has been stored yet.
    fn load(&mut self) -> Result<Option<Vec<f64>>, MonitorError>;

    /// Store a first baseline, leaving any existing one untouched.
    fn save(&mut self, rates: &[f64]) -> Result<(), MonitorError>;

    /// Overwrite the stored baseline.
    fn replace(&mut self, rates: &[f64]) -> Result<(), MonitorError>;
}

/// On-disk layout of `start_rates.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
struct StoredBaseline {
    start_rates: Vec<f64>,
}

/// [`BaselineStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonBaselineStore {
    path: PathBuf,
}

impl JsonBaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BaselineStore for JsonBaselineStore {
    fn load(&mut self) -> Result<Option<Vec<f64>>, MonitorError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let stored: StoredBaseline = serde_json::from_str(&text).map_err(|error| {
            MonitorError::Config(format!("{} is malformed: {}", self.path.display(), error))
        })?;
        Ok(Some(stored.start_rates))
    }

    fn save(&mut self, rates: &[f64]) -> Result<(), MonitorError> {
        write_new_json(
            &self.path,
            &StoredBaseline {
                start_rates: rates.to_vec(),
            },
        )
    }

    fn replace(&mut self, rates: &[f64]) -> Result<(), MonitorError> {
        let text = serde_json::to_string_pretty(&StoredBaseline {
            start_rates: rates.to_vec(),
        })?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

/// In-process [`BaselineStore`], nothing survives the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryBaselineStore {
    rates: Option<Vec<f64>>,
    writes: usize,
}

impl MemoryBaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a baseline, as if persisted by an earlier run.
    pub fn with_rates(rates: Vec<f64>) -> Self {
        Self {
            rates: Some(rates),
            writes: 0,
        }
    }

    pub fn rates(&self) -> Option<&[f64]> {
        self.rates.as_deref()
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BaselineStore for MemoryBaselineStore {
    fn load(&mut self) -> Result<Option<Vec<f64>>, MonitorError> {
        Ok(self.rates.clone())
    }

    fn save(&mut self, rates: &[f64]) -> Result<(), MonitorError> {
        if self.rates.is_none() {
            self.rates = Some(rates.to_vec());
            self.writes += 1;
        }
        Ok(())
    }

    fn replace(&mut self, rates: &[f64]) -> Result<(), MonitorError> {
        self.rates = Some(rates.to_vec());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BASELINE_FILE;

    #[test]
    fn test_json_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonBaselineStore::new(dir.path().join(BASELINE_FILE));

        assert_eq!(store.load().unwrap(), None);

        store.save(&[100.0, 200.5, 0.25]).unwrap();
        assert_eq!(store.load().unwrap(), Some(vec![100.0, 200.5, 0.25]));

        // save never overwrites an established file
        store.save(&[1.0]).unwrap();
        assert_eq!(store.load().unwrap(), Some(vec![100.0, 200.5, 0.25]));

        store.replace(&[1.0, 2.0]).unwrap();
        assert_eq!(store.load().unwrap(), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn test_json_store_reads_start_rates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BASELINE_FILE);
        std::fs::write(&path, r#"{"start_rates": [64000.5, 3100.0]}"#).unwrap();

        let mut store = JsonBaselineStore::new(&path);
        assert_eq!(store.load().unwrap(), Some(vec![64000.5, 3100.0]));
    }

    #[test]
    fn test_json_store_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BASELINE_FILE);
        std::fs::write(&path, r#"{"start_rates": "oops"}"#).unwrap();

        let mut store = JsonBaselineStore::new(&path);
        assert!(matches!(store.load(), Err(MonitorError::Config(_))));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let mut store = MemoryBaselineStore::new();
        store.save(&[1.0]).unwrap();
        store.save(&[2.0]).unwrap();
        assert_eq!(store.rates(), Some(&[1.0][..]));
        assert_eq!(store.writes(), 1);

        store.replace(&[3.0]).unwrap();
        assert_eq!(store.rates(), Some(&[3.0][..]));
        assert_eq!(store.writes(), 2);
    }
}

//! Destinations for completed forecast records

use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// A forecast ready to be stored against a store and date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub store_id: u64,
    /// Set when the history was restricted to a single product
    pub product_id: Option<u64>,
    /// Date the forecast applies to
    pub forecast_date: NaiveDate,
    pub predicted_quantity: f64,
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub generated_at: DateTime<Utc>,
}

/// Persists forecast records
pub trait ForecastSink {
    /// Store one record
    fn persist(&mut self, record: &ForecastRecord) -> Result<()>;

    /// Most recently stored record, if any
    fn latest(&self) -> Result<Option<ForecastRecord>>;
}

/// Keeps records in memory
#[derive(Debug, Default)]
pub struct InMemorySink {
    records: Vec<ForecastRecord>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored records in insertion order
    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }
}

impl ForecastSink for InMemorySink {
    fn persist(&mut self, record: &ForecastRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn latest(&self) -> Result<Option<ForecastRecord>> {
        Ok(self.records.last().cloned())
    }
}

/// Appends records to a file as one JSON object per line
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every record in the file
    pub fn read_all(&self) -> Result<Vec<ForecastRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl ForecastSink for JsonLinesSink {
    fn persist(&mut self, record: &ForecastRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn latest(&self) -> Result<Option<ForecastRecord>> {
        Ok(self.read_all()?.pop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(store_id: u64, predicted_quantity: f64) -> ForecastRecord {
        ForecastRecord {
            store_id,
            product_id: None,
            forecast_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            predicted_quantity,
            mae: Some(1.25),
            rmse: Some(1.5),
            generated_at: DateTime::parse_from_rfc3339("2024-06-01T08:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_in_memory_sink() {
        let mut sink = InMemorySink::new();
        assert_eq!(sink.latest().unwrap(), None);

        sink.persist(&record(1, 10.0)).unwrap();
        sink.persist(&record(1, 12.0)).unwrap();

        assert_eq!(sink.records().len(), 2);
        assert_eq!(sink.latest().unwrap(), Some(record(1, 12.0)));
    }

    #[test]
    fn test_json_lines_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonLinesSink::new(dir.path().join("forecasts.jsonl"));
        assert!(sink.read_all().unwrap().is_empty());

        sink.persist(&record(3, 40.5)).unwrap();
        let mut second = record(3, 41.0);
        second.mae = None;
        second.rmse = None;
        sink.persist(&second).unwrap();

        let records = sink.read_all().unwrap();
        assert_eq!(records, vec![record(3, 40.5), second.clone()]);
        assert_eq!(sink.latest().unwrap(), Some(second));
    }

    #[test]
    fn test_json_lines_sink_keeps_exact_floats() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonLinesSink::new(dir.path().join("forecasts.jsonl"));

        let mut stored = record(5, 26.779330788258946);
        stored.mae = Some((2.0_f64).sqrt() * 3.7);
        stored.rmse = Some(1.0 / 3.0 * 14.2);
        sink.persist(&stored).unwrap();

        let read = sink.latest().unwrap().unwrap();
        assert_eq!(
            read.predicted_quantity.to_bits(),
            stored.predicted_quantity.to_bits()
        );
        assert_eq!(read, stored);
    }
}

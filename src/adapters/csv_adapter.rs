//! CSV minute-bar loader.
//!
//! One file per pair: `<base_path>/<pair>.csv` with header
//! `timestamp,open,high,low,close,volume` and timestamps as
//! `YYYY-MM-DD HH:MM:SS`.

use crate::domain::bar::MinuteBar;
use crate::domain::error::SmacrossError;
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, pair: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", pair))
    }

    pub fn load_bars(&self, pair: &str) -> Result<Vec<MinuteBar>, SmacrossError> {
        let path = self.csv_path(pair);
        if !path.exists() {
            return Err(SmacrossError::UnknownPair {
                pair: pair.to_string(),
            });
        }
        read_bars(&path, pair)
    }

    pub fn list_pairs(&self) -> Result<Vec<String>, SmacrossError> {
        let mut pairs = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    pairs.push(stem.to_string_lossy().into_owned());
                }
            }
        }
        pairs.sort();
        Ok(pairs)
    }
}

fn parse_column(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    pair: &str,
) -> Result<f64, SmacrossError> {
    let value: f64 = record
        .get(index)
        .ok_or_else(|| SmacrossError::DataUnavailable {
            asset: pair.to_string(),
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| SmacrossError::DataUnavailable {
            asset: pair.to_string(),
            reason: format!("invalid {} value: {}", name, e),
        })?;
    if !value.is_finite() {
        return Err(SmacrossError::DataUnavailable {
            asset: pair.to_string(),
            reason: format!("non-finite {} value", name),
        });
    }
    Ok(value)
}

fn read_bars(path: &Path, pair: &str) -> Result<Vec<MinuteBar>, SmacrossError> {
    let content = fs::read_to_string(path)?;
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut bars = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| SmacrossError::DataUnavailable {
            asset: pair.to_string(),
            reason: format!("CSV parse error: {}", e),
        })?;

        let ts_str = record.get(0).ok_or_else(|| SmacrossError::DataUnavailable {
            asset: pair.to_string(),
            reason: "missing timestamp column".into(),
        })?;
        let timestamp = NaiveDateTime::parse_from_str(ts_str.trim(), TIMESTAMP_FORMAT).map_err(
            |e| SmacrossError::DataUnavailable {
                asset: pair.to_string(),
                reason: format!("invalid timestamp format: {}", e),
            },
        )?;

        bars.push(MinuteBar {
            timestamp,
            open: parse_column(&record, 1, "open", pair)?,
            high: parse_column(&record, 2, "high", pair)?,
            low: parse_column(&record, 3, "low", pair)?,
            close: parse_column(&record, 4, "close", pair)?,
            volume: parse_column(&record, 5, "volume", pair)?,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

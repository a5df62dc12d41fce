//! Metrics recorders: CSV output, trace logging and in-memory capture.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::trace;

use crate::domain::error::SmacrossError;
use crate::ports::metrics_port::MetricsRecorder;

/// Column order of the recorded snapshot.
pub const COLUMNS: [&str; 5] = ["price", "cash", "price_change", "short_mavg", "long_mavg"];

/// Writes one row per tick; absent values become empty cells.
pub struct CsvRecorder<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvRecorder<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SmacrossError> {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: Write> CsvRecorder<W> {
    pub fn new(inner: W) -> Result<Self, SmacrossError> {
        let mut writer = csv::Writer::from_writer(inner);
        let mut header = vec!["tick"];
        header.extend(COLUMNS);
        writer.write_record(&header).map_err(recording_error)?;
        Ok(Self { writer })
    }

    pub fn flush(&mut self) -> Result<(), SmacrossError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W, SmacrossError> {
        self.writer.into_inner().map_err(|e| SmacrossError::Recording {
            reason: e.to_string(),
        })
    }
}

fn recording_error(e: csv::Error) -> SmacrossError {
    SmacrossError::Recording {
        reason: e.to_string(),
    }
}

impl<W: Write> MetricsRecorder for CsvRecorder<W> {
    fn record(
        &mut self,
        tick: u64,
        fields: &BTreeMap<&'static str, f64>,
    ) -> Result<(), SmacrossError> {
        let mut row = vec![tick.to_string()];
        row.extend(
            COLUMNS
                .iter()
                .map(|name| fields.get(name).map(|v| v.to_string()).unwrap_or_default()),
        );
        self.writer.write_record(&row).map_err(recording_error)
    }
}

/// Emits each tick at trace level and retains nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceRecorder {
    recorded: u64,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> u64 {
        self.recorded
    }
}

impl MetricsRecorder for TraceRecorder {
    fn record(
        &mut self,
        tick: u64,
        fields: &BTreeMap<&'static str, f64>,
    ) -> Result<(), SmacrossError> {
        trace!(tick, ?fields, "tick metrics");
        self.recorded += 1;
        Ok(())
    }
}

/// One captured row.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTick {
    pub tick: u64,
    pub fields: BTreeMap<&'static str, f64>,
}

/// Keeps every recorded tick in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecorder {
    pub rows: Vec<RecordedTick>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn series(&self, name: &str) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.fields.get(name).copied()).collect()
    }
}

impl MetricsRecorder for MemoryRecorder {
    fn record(
        &mut self,
        tick: u64,
        fields: &BTreeMap<&'static str, f64>,
    ) -> Result<(), SmacrossError> {
        self.rows.push(RecordedTick {
            tick,
            fields: fields.clone(),
        });
        Ok(())
    }
}

//! Per-tick metrics recording port trait.

use std::collections::BTreeMap;

use crate::domain::error::SmacrossError;

pub trait MetricsRecorder {
    /// Record the named values computed on `tick`. Failures are reported
    /// back but never affect the trading decision.
    fn record(
        &mut self,
        tick: u64,
        fields: &BTreeMap<&'static str, f64>,
    ) -> Result<(), SmacrossError>;
}

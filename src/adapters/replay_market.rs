//! In-memory bar replay implementing the market data and clock ports.

use chrono::{Duration, NaiveDateTime};
use std::collections::{BTreeSet, HashMap};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::domain::asset::Asset;
use crate::domain::bar::{BarField, MinuteBar};
use crate::domain::error::SmacrossError;
use crate::domain::moving_average::bar_frequency;
use crate::ports::clock_port::BarClock;
use crate::ports::market_data_port::MarketDataSource;

/// Replays one-minute bars for one or more pairs along a shared timeline.
///
/// Before the first [`BarClock::advance`] no bar is visible. Missing minutes
/// are not filled: a history window that crosses a gap is `DataUnavailable`.
#[derive(Debug, Clone, Default)]
pub struct ReplayMarket {
    series: HashMap<Asset, Vec<MinuteBar>>,
    timeline: Vec<NaiveDateTime>,
    cursor: Option<usize>,
}

impl ReplayMarket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, pair: &str, mut bars: Vec<MinuteBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        self.series.insert(Asset::new(pair), bars);
        self.rebuild_timeline();
        self
    }

    pub fn from_csv(adapter: &CsvAdapter, pairs: &[&str]) -> Result<Self, SmacrossError> {
        let mut market = Self::new();
        for pair in pairs {
            market = market.with_bars(pair, adapter.load_bars(pair)?);
        }
        Ok(market)
    }

    pub fn now(&self) -> Option<NaiveDateTime> {
        self.cursor.map(|i| self.timeline[i])
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    fn rebuild_timeline(&mut self) {
        let stamps: BTreeSet<NaiveDateTime> = self
            .series
            .values()
            .flat_map(|bars| bars.iter().map(|b| b.timestamp))
            .collect();
        self.timeline = stamps.into_iter().collect();
        self.cursor = None;
    }

    /// Bars at or before the current timestamp.
    fn visible(&self, asset: &Asset) -> Result<&[MinuteBar], SmacrossError> {
        let bars = self
            .series
            .get(asset)
            .ok_or_else(|| SmacrossError::UnknownPair {
                pair: asset.to_string(),
            })?;
        let now = self.now().ok_or_else(|| SmacrossError::DataUnavailable {
            asset: asset.to_string(),
            reason: "replay has not started".into(),
        })?;
        let end = bars.partition_point(|b| b.timestamp <= now);
        Ok(&bars[..end])
    }

    fn bar_at_now(&self, asset: &Asset) -> Option<&MinuteBar> {
        let now = self.now()?;
        self.visible(asset)
            .ok()?
            .last()
            .filter(|bar| bar.timestamp == now)
    }
}

impl MarketDataSource for ReplayMarket {
    fn resolve(&self, pair: &str) -> Result<Asset, SmacrossError> {
        let asset = Asset::new(pair.trim());
        if self.series.contains_key(&asset) {
            Ok(asset)
        } else {
            Err(SmacrossError::UnknownPair {
                pair: pair.to_string(),
            })
        }
    }

    fn history(
        &self,
        asset: &Asset,
        field: BarField,
        bar_count: usize,
        frequency: Duration,
    ) -> Result<Vec<f64>, SmacrossError> {
        if frequency != bar_frequency() {
            return Err(SmacrossError::DataUnavailable {
                asset: asset.to_string(),
                reason: format!("unsupported frequency {}s", frequency.num_seconds()),
            });
        }
        let bars = self.visible(asset)?;
        if bars.len() < bar_count {
            return Err(SmacrossError::InsufficientHistory {
                asset: asset.to_string(),
                bars: bars.len(),
                requested: bar_count,
            });
        }
        let window = &bars[bars.len() - bar_count..];
        if let (Some(first), Some(last)) = (window.first(), window.last()) {
            let span = last.timestamp - first.timestamp;
            if span != frequency * (bar_count as i32 - 1) {
                return Err(SmacrossError::DataUnavailable {
                    asset: asset.to_string(),
                    reason: format!(
                        "{} bars span {}s, expected consecutive minutes",
                        bar_count,
                        span.num_seconds()
                    ),
                });
            }
        }
        Ok(window.iter().map(|b| b.field(field)).collect())
    }

    fn current(&self, asset: &Asset, field: BarField) -> Result<f64, SmacrossError> {
        self.visible(asset)?
            .last()
            .map(|b| b.field(field))
            .ok_or_else(|| SmacrossError::DataUnavailable {
                asset: asset.to_string(),
                reason: "no bar yet".into(),
            })
    }

    fn can_trade(&self, asset: &Asset) -> bool {
        self.bar_at_now(asset).is_some_and(MinuteBar::is_liquid)
    }
}

impl BarClock for ReplayMarket {
    fn advance(&mut self) -> Option<NaiveDateTime> {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next < self.timeline.len() {
            self.cursor = Some(next);
            self.now()
        } else {
            None
        }
    }
}

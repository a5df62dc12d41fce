//! Per-run strategy state.

use tracing::debug;

use crate::domain::asset::Asset;
use crate::domain::config::StrategyConfig;
use crate::domain::error::SmacrossError;
use crate::ports::market_data_port::MarketDataSource;

/// Mutable state owned by one strategy instance for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyState {
    tick_count: u64,
    asset: Asset,
    baseline_price: Option<f64>,
}

impl StrategyState {
    /// Resolve the configured pair and start at tick zero with no baseline.
    pub fn initialize(
        config: &StrategyConfig,
        market: &dyn MarketDataSource,
    ) -> Result<Self, SmacrossError> {
        let asset = market.resolve(&config.pair)?;
        debug!(pair = %config.pair, asset = %asset, "resolved strategy asset");
        Ok(StrategyState {
            tick_count: 0,
            asset,
            baseline_price: None,
        })
    }

    pub fn on_tick_start(&mut self) {
        self.tick_count += 1;
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    pub fn baseline_price(&self) -> Option<f64> {
        self.baseline_price
    }

    /// Set the baseline on first use; later calls return the existing anchor.
    pub fn anchor_baseline(&mut self, price: f64) -> f64 {
        *self.baseline_price.get_or_insert(price)
    }

    /// True once at least `long_window` ticks have been seen.
    pub fn is_warm(&self, long_window: usize) -> bool {
        self.tick_count >= long_window as u64
    }
}

/// Relative change of `price` against `baseline`.
pub fn price_change(price: f64, baseline: f64) -> f64 {
    (price - baseline) / baseline
}

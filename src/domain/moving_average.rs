//! Simple moving average over a trailing price window.
//!
//! SMA(n) = (P[i-n+1] + ... + P[i]) / n, right-aligned at the current bar.

use chrono::Duration;

use crate::domain::asset::Asset;
use crate::domain::bar::BarField;
use crate::domain::error::SmacrossError;
use crate::ports::market_data_port::MarketDataSource;

/// Sampling granularity for every history request the strategy makes.
pub fn bar_frequency() -> Duration {
    Duration::minutes(1)
}

/// Arithmetic mean of a window that must hold exactly `period` finite samples.
pub fn window_mean(asset: &Asset, window: &[f64], period: usize) -> Result<f64, SmacrossError> {
    if period == 0 || window.len() != period {
        return Err(SmacrossError::InsufficientHistory {
            asset: asset.to_string(),
            bars: window.len(),
            requested: period,
        });
    }
    if window.iter().any(|v| !v.is_finite()) {
        return Err(SmacrossError::DataUnavailable {
            asset: asset.to_string(),
            reason: "non-finite sample in price window".into(),
        });
    }
    Ok(window.iter().sum::<f64>() / period as f64)
}

/// Fetch the trailing `period` prices for `asset` and average them.
pub fn trailing_mean(
    market: &dyn MarketDataSource,
    asset: &Asset,
    period: usize,
) -> Result<f64, SmacrossError> {
    let window = market.history(asset, BarField::Price, period, bar_frequency())?;
    window_mean(asset, &window, period)
}

/// The pair of averages computed fresh on every warmed-up tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverageSample {
    pub short_mavg: f64,
    pub long_mavg: f64,
}

impl MovingAverageSample {
    pub fn compute(
        market: &dyn MarketDataSource,
        asset: &Asset,
        short_window: usize,
        long_window: usize,
    ) -> Result<Self, SmacrossError> {
        Ok(MovingAverageSample {
            short_mavg: trailing_mean(market, asset, short_window)?,
            long_mavg: trailing_mean(market, asset, long_window)?,
        })
    }
}

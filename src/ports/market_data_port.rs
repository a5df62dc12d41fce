//! Market data access port trait.

use chrono::Duration;

use crate::domain::asset::Asset;
use crate::domain::bar::BarField;
use crate::domain::error::SmacrossError;

/// Supplies historical price windows and current values for an asset.
pub trait MarketDataSource {
    /// Resolve a configured pair symbol to an [`Asset`].
    fn resolve(&self, pair: &str) -> Result<Asset, SmacrossError>;

    /// The trailing `bar_count` values of `field` sampled at `frequency`,
    /// most recent last and inclusive of the current bar.
    fn history(
        &self,
        asset: &Asset,
        field: BarField,
        bar_count: usize,
        frequency: Duration,
    ) -> Result<Vec<f64>, SmacrossError>;

    fn current(&self, asset: &Asset, field: BarField) -> Result<f64, SmacrossError>;

    /// False while the market is closed, halted or shows no liquidity.
    fn can_trade(&self, asset: &Asset) -> bool;
}

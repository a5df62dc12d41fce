//! Order routing port traits.

use chrono::NaiveDateTime;

use crate::domain::asset::Asset;
use crate::domain::order::Fill;
use crate::ports::market_data_port::MarketDataSource;

/// Accepts target-allocation orders. Fire-and-forget: the outcome is only
/// observable later through a [`PortfolioView`](crate::ports::portfolio_port::PortfolioView).
pub trait OrderGateway {
    fn set_target_fraction(&mut self, asset: &Asset, fraction: f64);
}

/// Host-side resolution of open orders against the current market.
pub trait OrderSettlement {
    fn settle(&mut self, market: &dyn MarketDataSource, timestamp: NaiveDateTime) -> Vec<Fill>;
}

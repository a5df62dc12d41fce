//! Paper-account state and equity tracking.
//!
//! Fills are applied here but logged by the driver, not the account.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use super::asset::Asset;
use super::order::Fill;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    /// Quantity held per asset; flat assets are absent.
    pub holdings: HashMap<Asset, f64>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            holdings: HashMap::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn quantity(&self, asset: &Asset) -> f64 {
        self.holdings.get(asset).copied().unwrap_or(0.0)
    }

    /// Move cash and adjust the holding. Holdings that reach zero are removed.
    pub fn apply_fill(&mut self, fill: &Fill) {
        self.cash -= fill.quantity * fill.execution_price + fill.commission;

        let quantity = self.holdings.entry(fill.asset.clone()).or_insert(0.0);
        *quantity += fill.quantity;
        if *quantity <= f64::EPSILON {
            self.holdings.remove(&fill.asset);
        }
    }

    pub fn record_equity(&mut self, timestamp: NaiveDateTime, equity: f64) {
        self.equity_curve.push(EquityPoint { timestamp, equity });
    }

    /// Cash plus holdings valued at `price_map`; unpriced holdings count as zero.
    pub fn total_equity(&self, price_map: &HashMap<Asset, f64>) -> f64 {
        let position_value: f64 = self
            .holdings
            .iter()
            .filter_map(|(asset, quantity)| price_map.get(asset).map(|&price| quantity * price))
            .sum();
        self.cash + position_value
    }

    /// Largest peak-to-trough fall of the equity curve, as a fraction of the peak.
    pub fn max_drawdown(&self) -> f64 {
        let mut peak = f64::NEG_INFINITY;
        let mut worst = 0.0_f64;
        for point in &self.equity_curve {
            peak = peak.max(point.equity);
            if peak > 0.0 {
                worst = worst.max((peak - point.equity) / peak);
            }
        }
        worst
    }
}

//! Fill simulation for target-fraction orders.
//!
//! Rebalances a holding towards `fraction * equity` with slippage and a
//! percentage commission. Quantities are fractional.

use super::asset::Asset;
use super::portfolio::Portfolio;

/// Cost parameters for simulated fills.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionConfig {
    pub commission_pct: f64,
    pub slippage_pct: f64,
}

/// Commission: trade_value * pct / 100.
pub fn calculate_commission(trade_value: f64, config: &ExecutionConfig) -> f64 {
    trade_value.abs() * config.commission_pct / 100.0
}

/// Buy: execution_price = market_price * (1 + slippage_pct / 100)
pub fn apply_slippage_buy(market_price: f64, slippage_pct: f64) -> f64 {
    market_price * (1.0 + slippage_pct / 100.0)
}

/// Sell: execution_price = market_price * (1 - slippage_pct / 100)
pub fn apply_slippage_sell(market_price: f64, slippage_pct: f64) -> f64 {
    market_price * (1.0 - slippage_pct / 100.0)
}

/// Quantity change and prices for one rebalance.
#[derive(Debug, Clone, PartialEq)]
pub struct Rebalance {
    /// Signed change in position; negative for sells.
    pub quantity: f64,
    pub execution_price: f64,
    pub commission: f64,
}

/// Work out the trade that moves `asset` to `fraction` of total equity.
///
/// Returns `None` when no trade is needed or cash cannot cover any quantity.
/// A fraction of zero always sells the whole holding.
pub fn rebalance_to_target(
    portfolio: &Portfolio,
    asset: &Asset,
    fraction: f64,
    market_price: f64,
    config: &ExecutionConfig,
) -> Option<Rebalance> {
    if market_price <= 0.0 || !market_price.is_finite() {
        return None;
    }
    let fraction = fraction.clamp(0.0, 1.0);
    let held = portfolio.quantity(asset);
    let current_value = held * market_price;
    let equity = portfolio.cash + current_value;
    let delta_value = fraction * equity - current_value;

    if delta_value > 0.0 {
        let execution_price = apply_slippage_buy(market_price, config.slippage_pct);
        let affordable = portfolio.cash / (1.0 + config.commission_pct / 100.0);
        let value = delta_value.min(affordable);
        let quantity = value / execution_price;
        if quantity <= f64::EPSILON {
            return None;
        }
        Some(Rebalance {
            quantity,
            execution_price,
            commission: calculate_commission(quantity * execution_price, config),
        })
    } else if delta_value < 0.0 && held > 0.0 {
        let execution_price = apply_slippage_sell(market_price, config.slippage_pct);
        let quantity = if fraction == 0.0 {
            held
        } else {
            (-delta_value / market_price).min(held)
        };
        if quantity <= f64::EPSILON {
            return None;
        }
        Some(Rebalance {
            quantity: -quantity,
            execution_price,
            commission: calculate_commission(quantity * execution_price, config),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Fill;
    use approx::assert_relative_eq;

    fn asset() -> Asset {
        Asset::new("btc_usdt")
    }

    fn holding(portfolio: &mut Portfolio, quantity: f64, price: f64) {
        portfolio.apply_fill(&Fill {
            order_id: 0,
            asset: asset(),
            timestamp: None,
            quantity,
            execution_price: price,
            commission: 0.0,
        });
    }

    #[test]
    fn commission_is_percentage() {
        let config = ExecutionConfig {
            commission_pct: 0.1,
            slippage_pct: 0.0,
        };
        assert_relative_eq!(calculate_commission(10_000.0, &config), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn slippage_directions() {
        assert_relative_eq!(apply_slippage_buy(100.0, 1.0), 101.0, epsilon = 1e-9);
        assert_relative_eq!(apply_slippage_sell(100.0, 1.0), 99.0, epsilon = 1e-9);
    }

    #[test]
    fn full_allocation_from_cash() {
        let portfolio = Portfolio::new(1_000.0);
        let r = rebalance_to_target(&portfolio, &asset(), 1.0, 10.0, &ExecutionConfig::default())
            .unwrap();
        assert_relative_eq!(r.quantity, 100.0);
        assert_relative_eq!(r.execution_price, 10.0);
        assert_relative_eq!(r.commission, 0.0);
    }

    #[test]
    fn commission_is_reserved_from_cash() {
        let portfolio = Portfolio::new(1_010.0);
        let config = ExecutionConfig {
            commission_pct: 1.0,
            slippage_pct: 0.0,
        };
        let r = rebalance_to_target(&portfolio, &asset(), 1.0, 10.0, &config).unwrap();
        assert_relative_eq!(r.quantity, 100.0, epsilon = 1e-9);
        assert_relative_eq!(
            r.quantity * r.execution_price + r.commission,
            1_010.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn zero_fraction_sells_everything() {
        let mut portfolio = Portfolio::new(1_000.0);
        holding(&mut portfolio, 4.0, 100.0);
        let config = ExecutionConfig {
            commission_pct: 0.0,
            slippage_pct: 0.5,
        };
        let r = rebalance_to_target(&portfolio, &asset(), 0.0, 120.0, &config).unwrap();
        assert_relative_eq!(r.quantity, -4.0);
        assert_relative_eq!(r.execution_price, 119.4, epsilon = 1e-9);
    }

    #[test]
    fn already_at_target_is_noop() {
        let mut portfolio = Portfolio::new(1_000.0);
        holding(&mut portfolio, 10.0, 100.0);
        assert_eq!(portfolio.cash, 0.0);
        assert!(
            rebalance_to_target(&portfolio, &asset(), 1.0, 100.0, &ExecutionConfig::default())
                .is_none()
        );
    }

    #[test]
    fn flat_and_zero_target_is_noop() {
        let portfolio = Portfolio::new(1_000.0);
        assert!(
            rebalance_to_target(&portfolio, &asset(), 0.0, 100.0, &ExecutionConfig::default())
                .is_none()
        );
    }

    #[test]
    fn bad_price_is_noop() {
        let portfolio = Portfolio::new(1_000.0);
        let config = ExecutionConfig::default();
        assert!(rebalance_to_target(&portfolio, &asset(), 1.0, 0.0, &config).is_none());
        assert!(rebalance_to_target(&portfolio, &asset(), 1.0, f64::NAN, &config).is_none());
    }
}

//! Simulated broker: portfolio view, order gateway and settlement.
//!
//! Orders queue as open handles and fill at the current price once their
//! delay has elapsed. With `fill_delay = 0` an order placed on one bar fills
//! at the start of the next.

use chrono::NaiveDateTime;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::domain::asset::Asset;
use crate::domain::backtest::BacktestConfig;
use crate::domain::bar::BarField;
use crate::domain::execution::{rebalance_to_target, ExecutionConfig};
use crate::domain::order::{Fill, OrderHandle, OrderIntent};
use crate::domain::portfolio::{EquityPoint, Portfolio};
use crate::ports::market_data_port::MarketDataSource;
use crate::ports::order_port::{OrderGateway, OrderSettlement};
use crate::ports::portfolio_port::PortfolioView;

#[derive(Debug, Clone)]
pub struct PaperBroker {
    portfolio: Portfolio,
    open: Vec<OrderHandle>,
    execution: ExecutionConfig,
    fill_delay: u32,
    next_order_id: u64,
}

impl PaperBroker {
    pub fn new(config: &BacktestConfig) -> Self {
        PaperBroker {
            portfolio: Portfolio::new(config.initial_capital),
            open: Vec::new(),
            execution: ExecutionConfig {
                commission_pct: config.commission_pct,
                slippage_pct: config.slippage_pct,
            },
            fill_delay: config.fill_delay,
            next_order_id: 1,
        }
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// One point per settled bar, valued at that bar's prices.
    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.portfolio.equity_curve
    }

    fn mark_to_market(&mut self, market: &dyn MarketDataSource, timestamp: NaiveDateTime) {
        let prices: HashMap<Asset, f64> = self
            .portfolio
            .holdings
            .keys()
            .filter_map(|asset| {
                market
                    .current(asset, BarField::Price)
                    .ok()
                    .map(|price| (asset.clone(), price))
            })
            .collect();
        let equity = self.portfolio.total_equity(&prices);
        self.portfolio.record_equity(timestamp, equity);
    }
}

impl PortfolioView for PaperBroker {
    fn cash(&self) -> f64 {
        self.portfolio.cash
    }

    fn open_orders(&self) -> &[OrderHandle] {
        &self.open
    }

    fn position_amount(&self, asset: &Asset) -> f64 {
        self.portfolio.quantity(asset)
    }
}

impl OrderGateway for PaperBroker {
    fn set_target_fraction(&mut self, asset: &Asset, fraction: f64) {
        let handle = OrderHandle {
            id: self.next_order_id,
            intent: OrderIntent::new(asset.clone(), fraction),
            bars_until_fill: self.fill_delay,
        };
        debug!(order_id = handle.id, asset = %asset, fraction, "order accepted");
        self.next_order_id += 1;
        self.open.push(handle);
    }
}

impl OrderSettlement for PaperBroker {
    fn settle(
        &mut self,
        market: &dyn MarketDataSource,
        timestamp: NaiveDateTime,
    ) -> Vec<Fill> {
        let mut fills = Vec::new();
        let mut still_open = Vec::with_capacity(self.open.len());

        for mut handle in std::mem::take(&mut self.open) {
            if handle.bars_until_fill > 0 {
                handle.bars_until_fill -= 1;
                still_open.push(handle);
                continue;
            }

            let asset = &handle.intent.asset;
            if !market.can_trade(asset) {
                still_open.push(handle);
                continue;
            }
            let price = match market.current(asset, BarField::Price) {
                Ok(p) => p,
                Err(e) => {
                    warn!(
                        order_id = handle.id,
                        error = %e,
                        "no price to fill order, keeping it open"
                    );
                    still_open.push(handle);
                    continue;
                }
            };

            match rebalance_to_target(
                &self.portfolio,
                asset,
                handle.intent.target_fraction,
                price,
                &self.execution,
            ) {
                Some(r) => {
                    let fill = Fill {
                        order_id: handle.id,
                        asset: asset.clone(),
                        timestamp: Some(timestamp),
                        quantity: r.quantity,
                        execution_price: r.execution_price,
                        commission: r.commission,
                    };
                    debug!(
                        order_id = fill.order_id,
                        quantity = fill.quantity,
                        price = fill.execution_price,
                        "order filled"
                    );
                    self.portfolio.apply_fill(&fill);
                    fills.push(fill);
                }
                None => debug!(order_id = handle.id, "order resolved without a trade"),
            }
        }

        self.open = still_open;
        self.mark_to_market(market, timestamp);
        fills
    }
}

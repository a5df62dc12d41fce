//! Replay driver loop.
//!
//! Advances the market clock one bar at a time, resolves due orders, runs
//! the strategy for that tick and finally calls its analyze hook.
//! BacktestConfig holds the host-side paper-trading parameters.

use chrono::NaiveDateTime;
use tracing::info;

use crate::domain::bar::BarField;
use crate::domain::order::{Fill, OrderIntent};
use crate::domain::signal::Action;
use crate::domain::strategy::CrossoverStrategy;
use crate::ports::clock_port::BarClock;
use crate::ports::market_data_port::MarketDataSource;
use crate::ports::metrics_port::MetricsRecorder;
use crate::ports::order_port::{OrderGateway, OrderSettlement};
use crate::ports::portfolio_port::PortfolioView;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub commission_pct: f64,
    pub slippage_pct: f64,
    /// Number of bars an order stays open before it can fill.
    pub fill_delay: u32,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 10_000.0,
            commission_pct: 0.0,
            slippage_pct: 0.0,
            fill_delay: 0,
        }
    }
}

/// An order intent emitted by the strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedOrder {
    pub tick: u64,
    pub timestamp: NaiveDateTime,
    pub intent: OrderIntent,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BacktestResult {
    pub ticks: u64,
    pub orders: Vec<IssuedOrder>,
    pub fills: Vec<Fill>,
    pub recording_failures: u64,
    pub final_cash: f64,
    pub final_position: f64,
    pub final_equity: f64,
    pub total_return: f64,
    /// Peak-to-trough fraction; filled in by hosts that track equity.
    pub max_drawdown: f64,
}

pub fn run_backtest<M, B>(
    strategy: &mut CrossoverStrategy,
    market: &mut M,
    broker: &mut B,
    recorder: &mut dyn MetricsRecorder,
) -> BacktestResult
where
    M: MarketDataSource + BarClock,
    B: PortfolioView + OrderGateway + OrderSettlement,
{
    let starting_cash = broker.cash();
    let mut result = BacktestResult::default();

    while let Some(timestamp) = market.advance() {
        result.fills.extend(broker.settle(&*market, timestamp));

        let outcome = strategy.handle_tick(&*market, broker, recorder);
        if let Action::SetTargetFraction { asset, fraction } = outcome.action() {
            result.orders.push(IssuedOrder {
                tick: outcome.tick,
                timestamp,
                intent: OrderIntent::new(asset.clone(), *fraction),
            });
        }
        if !outcome.recorded {
            result.recording_failures += 1;
        }
        result.ticks += 1;
    }

    strategy.analyze(&*broker);

    let asset = strategy.state().asset();
    result.final_cash = broker.cash();
    result.final_position = broker.position_amount(asset);
    let last_price = market.current(asset, BarField::Price).unwrap_or(0.0);
    result.final_equity = result.final_cash + result.final_position * last_price;
    if starting_cash > 0.0 {
        result.total_return = (result.final_equity - starting_cash) / starting_cash;
    }

    info!(
        ticks = result.ticks,
        orders = result.orders.len(),
        fills = result.fills.len(),
        final_equity = result.final_equity,
        "backtest complete"
    );
    result
}

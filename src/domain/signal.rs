//! Crossover signal evaluation.
//!
//! One call per tick. Reads the market and portfolio through their ports,
//! anchors the baseline price on first use, and returns the order action
//! together with the snapshot handed to the metrics recorder.
//!
//! Decision order once warmed up:
//! 1. Both moving averages (one-minute bars, right-aligned at the current bar)
//! 2. Current price, baseline anchor, price change
//! 3. Open orders present: hold
//! 4. Asset not tradable: hold
//! 5. short > long while flat: go fully long; short < long while long: exit

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::domain::asset::Asset;
use crate::domain::bar::BarField;
use crate::domain::config::StrategyConfig;
use crate::domain::moving_average::MovingAverageSample;
use crate::domain::state::{price_change, StrategyState};
use crate::ports::market_data_port::MarketDataSource;
use crate::ports::portfolio_port::PortfolioView;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    SetTargetFraction { asset: Asset, fraction: f64 },
}

impl Action {
    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }
}

/// Why a tick ended without an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    WarmingUp,
    DataUnavailable,
    OrderPending,
    NotTradable,
    NoSignal,
}

/// Values observed on one tick. Absent fields were not available.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickSnapshot {
    pub price: Option<f64>,
    pub cash: Option<f64>,
    pub price_change: Option<f64>,
    pub short_mavg: Option<f64>,
    pub long_mavg: Option<f64>,
}

impl TickSnapshot {
    /// Name to value mapping of the populated fields.
    pub fn fields(&self) -> BTreeMap<&'static str, f64> {
        [
            ("price", self.price),
            ("cash", self.cash),
            ("price_change", self.price_change),
            ("short_mavg", self.short_mavg),
            ("long_mavg", self.long_mavg),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.fields().len() == 5
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub action: Action,
    pub snapshot: TickSnapshot,
    pub hold: Option<HoldReason>,
}

impl Evaluation {
    fn hold(reason: HoldReason, snapshot: TickSnapshot) -> Self {
        Evaluation {
            action: Action::None,
            snapshot,
            hold: Some(reason),
        }
    }
}

/// The crossover rule alone, with every guard already passed.
pub fn decide(asset: &Asset, sample: &MovingAverageSample, position: f64) -> Action {
    if sample.short_mavg > sample.long_mavg && position == 0.0 {
        Action::SetTargetFraction {
            asset: asset.clone(),
            fraction: 1.0,
        }
    } else if sample.short_mavg < sample.long_mavg && position > 0.0 {
        Action::SetTargetFraction {
            asset: asset.clone(),
            fraction: 0.0,
        }
    } else {
        Action::None
    }
}

/// Evaluate one tick. `state.on_tick_start()` must already have run.
pub fn evaluate(
    state: &mut StrategyState,
    config: &StrategyConfig,
    market: &dyn MarketDataSource,
    portfolio: &dyn PortfolioView,
) -> Evaluation {
    let tick = state.tick_count();
    let cash = portfolio.cash();

    if !state.is_warm(config.long_window) {
        let snapshot = TickSnapshot {
            price: market
                .current(state.asset(), BarField::Price)
                .ok()
                .filter(|p| p.is_finite() && *p > 0.0),
            cash: Some(cash),
            ..TickSnapshot::default()
        };
        debug!(tick, long_window = config.long_window, "warming up");
        return Evaluation::hold(HoldReason::WarmingUp, snapshot);
    }

    let partial = TickSnapshot {
        cash: Some(cash),
        ..TickSnapshot::default()
    };

    let sample = match MovingAverageSample::compute(
        market,
        state.asset(),
        config.short_window,
        config.long_window,
    ) {
        Ok(sample) => sample,
        Err(e) => {
            warn!(tick, asset = %state.asset(), error = %e, "moving averages unavailable, skipping tick");
            return Evaluation::hold(HoldReason::DataUnavailable, partial);
        }
    };

    let price = match market.current(state.asset(), BarField::Price) {
        Ok(p) if p.is_finite() && p > 0.0 => p,
        Ok(p) => {
            warn!(tick, asset = %state.asset(), price = p, "non-positive price, skipping tick");
            return Evaluation::hold(HoldReason::DataUnavailable, partial);
        }
        Err(e) => {
            warn!(tick, asset = %state.asset(), error = %e, "current price unavailable, skipping tick");
            return Evaluation::hold(HoldReason::DataUnavailable, partial);
        }
    };

    let baseline = state.anchor_baseline(price);
    let snapshot = TickSnapshot {
        price: Some(price),
        cash: Some(cash),
        price_change: Some(price_change(price, baseline)),
        short_mavg: Some(sample.short_mavg),
        long_mavg: Some(sample.long_mavg),
    };

    let open = portfolio.open_orders().len();
    if open > 0 {
        debug!(tick, open_orders = open, "orders in flight, holding");
        return Evaluation::hold(HoldReason::OrderPending, snapshot);
    }

    if !market.can_trade(state.asset()) {
        debug!(tick, asset = %state.asset(), "asset not tradable, holding");
        return Evaluation::hold(HoldReason::NotTradable, snapshot);
    }

    let position = portfolio.position_amount(state.asset());
    let action = decide(state.asset(), &sample, position);
    debug!(
        tick,
        short_mavg = sample.short_mavg,
        long_mavg = sample.long_mavg,
        position,
        ?action,
        "crossover evaluated"
    );

    let hold = action.is_none().then_some(HoldReason::NoSignal);
    Evaluation {
        action,
        snapshot,
        hold,
    }
}

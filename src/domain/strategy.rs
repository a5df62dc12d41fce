//! Dual moving-average crossover strategy.
//!
//! Owns the configuration and per-run state and runs one tick at a time:
//! tick start, evaluation, order dispatch, then metrics recording.

use tracing::{debug, info, warn};

use crate::domain::config::StrategyConfig;
use crate::domain::error::SmacrossError;
use crate::domain::signal::{evaluate, Action, Evaluation};
use crate::domain::state::StrategyState;
use crate::ports::market_data_port::MarketDataSource;
use crate::ports::metrics_port::MetricsRecorder;
use crate::ports::order_port::OrderGateway;
use crate::ports::portfolio_port::PortfolioView;

#[derive(Debug, Clone)]
pub struct CrossoverStrategy {
    config: StrategyConfig,
    state: StrategyState,
}

/// What happened on one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub tick: u64,
    pub evaluation: Evaluation,
    /// False when the recorder rejected the snapshot.
    pub recorded: bool,
}

impl TickOutcome {
    pub fn action(&self) -> &Action {
        &self.evaluation.action
    }
}

impl CrossoverStrategy {
    /// Resolve the asset and build fresh state. Must succeed before any tick.
    pub fn initialize(
        config: StrategyConfig,
        market: &dyn MarketDataSource,
    ) -> Result<Self, SmacrossError> {
        let state = StrategyState::initialize(&config, market)?;
        info!(
            asset = %state.asset(),
            short_window = config.short_window,
            long_window = config.long_window,
            "crossover strategy initialized"
        );
        Ok(CrossoverStrategy { config, state })
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    pub fn handle_tick<B>(
        &mut self,
        market: &dyn MarketDataSource,
        broker: &mut B,
        recorder: &mut dyn MetricsRecorder,
    ) -> TickOutcome
    where
        B: PortfolioView + OrderGateway,
    {
        self.state.on_tick_start();
        let tick = self.state.tick_count();

        let evaluation = evaluate(&mut self.state, &self.config, market, &*broker);

        if let Action::SetTargetFraction { asset, fraction } = &evaluation.action {
            info!(tick, asset = %asset, fraction, "setting target allocation");
            broker.set_target_fraction(asset, *fraction);
        }

        let recorded = match recorder.record(tick, &evaluation.snapshot.fields()) {
            Ok(()) => true,
            Err(e) => {
                warn!(tick, error = %e, "failed to record tick metrics");
                false
            }
        };

        TickOutcome {
            tick,
            evaluation,
            recorded,
        }
    }

    /// Finalization hook, called once after the last tick. Reporting is left
    /// to the host.
    pub fn analyze(&self, final_portfolio: &dyn PortfolioView) {
        debug!(
            ticks = self.state.tick_count(),
            cash = final_portfolio.cash(),
            position = final_portfolio.position_amount(self.state.asset()),
            baseline_price = ?self.state.baseline_price(),
            "run finished"
        );
    }
}

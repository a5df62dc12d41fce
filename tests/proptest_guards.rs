mod common;

use common::{StubBroker, StubMarket, PAIR};
use proptest::prelude::*;
use smacross::adapters::csv_recorder::MemoryRecorder;
use smacross::domain::asset::Asset;
use smacross::domain::config::StrategyConfig;
use smacross::domain::moving_average::MovingAverageSample;
use smacross::domain::signal::{decide, Action};
use smacross::domain::state::price_change;
use smacross::domain::strategy::CrossoverStrategy;

fn windows() -> impl Strategy<Value = (usize, usize)> {
    (1usize..6).prop_flat_map(|short| (Just(short), (short + 1)..12))
}

fn prices() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1_000.0, 1..40)
}

proptest! {
    /// No order is ever issued while another order is in flight.
    #[test]
    fn open_orders_suppress_every_order(
        (short, long) in windows(),
        series in prices(),
        position in prop_oneof![Just(0.0f64), 0.1f64..100.0],
    ) {
        let mut market = StubMarket::new(&series);
        let config = StrategyConfig::new(PAIR, short, long).unwrap();
        let mut strategy = CrossoverStrategy::initialize(config, &market).unwrap();
        let mut broker = StubBroker::new(1_000.0).with_open_order();
        broker.position = position;
        let mut recorder = MemoryRecorder::new();

        for _ in 0..series.len() {
            market.advance();
            let out = strategy.handle_tick(&market, &mut broker, &mut recorder);
            prop_assert!(out.action().is_none());
        }
        prop_assert!(broker.sent.is_empty());
        prop_assert_eq!(recorder.rows.len(), series.len());
    }

    /// Ticks before the long window fills never evaluate or anchor a baseline.
    #[test]
    fn warm_up_never_trades(
        (short, long) in windows(),
        series in prices(),
    ) {
        let mut market = StubMarket::new(&series);
        let config = StrategyConfig::new(PAIR, short, long).unwrap();
        let mut strategy = CrossoverStrategy::initialize(config, &market).unwrap();
        let mut broker = StubBroker::new(1_000.0);
        let mut recorder = MemoryRecorder::new();

        for _ in 0..series.len().min(long - 1) {
            market.advance();
            let out = strategy.handle_tick(&market, &mut broker, &mut recorder);
            prop_assert!(out.action().is_none());
            prop_assert_eq!(strategy.state().baseline_price(), None);
        }
        prop_assert!(broker.sent.is_empty());
    }

    /// The baseline is the price of the first evaluated tick and never moves.
    #[test]
    fn baseline_is_anchored_once(
        (short, long) in windows(),
        series in prop::collection::vec(1.0f64..1_000.0, 12..40),
    ) {
        let mut market = StubMarket::new(&series);
        let config = StrategyConfig::new(PAIR, short, long).unwrap();
        let mut strategy = CrossoverStrategy::initialize(config, &market).unwrap();
        let mut broker = StubBroker::new(1_000.0);
        let mut recorder = MemoryRecorder::new();

        for i in 0..series.len() {
            market.advance();
            let out = strategy.handle_tick(&market, &mut broker, &mut recorder);
            if i + 1 >= long {
                prop_assert_eq!(strategy.state().baseline_price(), Some(series[long - 1]));
                let expected = price_change(series[i], series[long - 1]);
                prop_assert_eq!(out.evaluation.snapshot.price_change, Some(expected));
            }
        }
    }

    /// Already in the desired state means no order, whatever the spread.
    #[test]
    fn no_flip_flop(
        short_mavg in 1.0f64..1_000.0,
        long_mavg in 1.0f64..1_000.0,
        position in 0.001f64..1_000.0,
    ) {
        let asset = Asset::new(PAIR);
        let sample = MovingAverageSample { short_mavg, long_mavg };
        if short_mavg >= long_mavg {
            prop_assert_eq!(decide(&asset, &sample, position), Action::None);
        } else {
            prop_assert_eq!(decide(&asset, &sample, 0.0), Action::None);
        }
    }
}

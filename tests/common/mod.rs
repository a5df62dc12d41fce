#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use smacross::domain::asset::Asset;
use smacross::domain::bar::{BarField, MinuteBar};
use smacross::domain::error::SmacrossError;
use smacross::domain::order::{OrderHandle, OrderIntent};
use smacross::ports::market_data_port::MarketDataSource;
use smacross::ports::metrics_port::MetricsRecorder;
use smacross::ports::order_port::OrderGateway;
use smacross::ports::portfolio_port::PortfolioView;
use std::collections::BTreeMap;

pub const PAIR: &str = "btc_usdt";

/// Market stub over a single price series. `visible` is the number of bars
/// the host has delivered so far.
pub struct StubMarket {
    pub prices: Vec<f64>,
    pub visible: usize,
    pub tradable: bool,
    pub fail_history: bool,
    pub fail_current: bool,
    pub history_calls: std::cell::Cell<usize>,
}

impl StubMarket {
    pub fn new(prices: &[f64]) -> Self {
        Self {
            prices: prices.to_vec(),
            visible: 0,
            tradable: true,
            fail_history: false,
            fail_current: false,
            history_calls: std::cell::Cell::new(0),
        }
    }

    pub fn advance(&mut self) {
        self.visible += 1;
    }
}

impl MarketDataSource for StubMarket {
    fn resolve(&self, pair: &str) -> Result<Asset, SmacrossError> {
        if pair == PAIR {
            Ok(Asset::new(pair))
        } else {
            Err(SmacrossError::UnknownPair {
                pair: pair.to_string(),
            })
        }
    }

    fn history(
        &self,
        asset: &Asset,
        _field: BarField,
        bar_count: usize,
        _frequency: Duration,
    ) -> Result<Vec<f64>, SmacrossError> {
        self.history_calls.set(self.history_calls.get() + 1);
        if self.fail_history {
            return Err(SmacrossError::DataUnavailable {
                asset: asset.to_string(),
                reason: "feed gap".into(),
            });
        }
        let seen = &self.prices[..self.visible.min(self.prices.len())];
        if seen.len() < bar_count {
            return Err(SmacrossError::InsufficientHistory {
                asset: asset.to_string(),
                bars: seen.len(),
                requested: bar_count,
            });
        }
        Ok(seen[seen.len() - bar_count..].to_vec())
    }

    fn current(&self, asset: &Asset, _field: BarField) -> Result<f64, SmacrossError> {
        if self.fail_current || self.visible == 0 {
            return Err(SmacrossError::DataUnavailable {
                asset: asset.to_string(),
                reason: "no price".into(),
            });
        }
        Ok(self.prices[self.visible.min(self.prices.len()) - 1])
    }

    fn can_trade(&self, _asset: &Asset) -> bool {
        self.tradable
    }
}

/// Portfolio + gateway stub that records every order it receives.
pub struct StubBroker {
    pub cash: f64,
    pub position: f64,
    pub open: Vec<OrderHandle>,
    pub sent: Vec<(Asset, f64)>,
}

impl StubBroker {
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            position: 0.0,
            open: Vec::new(),
            sent: Vec::new(),
        }
    }

    pub fn with_open_order(mut self) -> Self {
        self.open.push(OrderHandle {
            id: 99,
            intent: OrderIntent::new(Asset::new(PAIR), 1.0),
            bars_until_fill: 1,
        });
        self
    }
}

impl PortfolioView for StubBroker {
    fn cash(&self) -> f64 {
        self.cash
    }

    fn open_orders(&self) -> &[OrderHandle] {
        &self.open
    }

    fn position_amount(&self, _asset: &Asset) -> f64 {
        self.position
    }
}

impl OrderGateway for StubBroker {
    fn set_target_fraction(&mut self, asset: &Asset, fraction: f64) {
        self.sent.push((asset.clone(), fraction));
    }
}

/// Recorder that always fails.
pub struct FailingRecorder {
    pub attempts: usize,
}

impl MetricsRecorder for FailingRecorder {
    fn record(
        &mut self,
        _tick: u64,
        _fields: &BTreeMap<&'static str, f64>,
    ) -> Result<(), SmacrossError> {
        self.attempts += 1;
        Err(SmacrossError::Recording {
            reason: "disk full".into(),
        })
    }
}

pub fn minute(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::minutes(i as i64)
}

pub fn minute_bars(closes: &[f64]) -> Vec<MinuteBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| MinuteBar {
            timestamp: minute(i),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        })
        .collect()
}

pub fn bars_csv(closes: &[f64]) -> String {
    let mut out = String::from("timestamp,open,high,low,close,volume\n");
    for bar in minute_bars(closes) {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.timestamp.format("%Y-%m-%d %H:%M:%S"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}

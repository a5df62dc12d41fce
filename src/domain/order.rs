//! Order intents, handles and fills.

use chrono::NaiveDateTime;

use super::asset::Asset;

/// Declarative "set position to this fraction of portfolio value" instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub asset: Asset,
    pub target_fraction: f64,
}

impl OrderIntent {
    /// Build an intent, clamping the fraction into `[0, 1]`.
    pub fn new(asset: Asset, target_fraction: f64) -> Self {
        OrderIntent {
            asset,
            target_fraction: target_fraction.clamp(0.0, 1.0),
        }
    }
}

/// An order accepted by the gateway and not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHandle {
    pub id: u64,
    pub intent: OrderIntent,
    /// Settlement passes remaining before the order may fill.
    pub bars_until_fill: u32,
}

/// Result of resolving an open order.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub order_id: u64,
    pub asset: Asset,
    pub timestamp: Option<NaiveDateTime>,
    /// Signed change in position; negative for sells.
    pub quantity: f64,
    pub execution_price: f64,
    pub commission: f64,
}

impl Fill {
    pub fn is_buy(&self) -> bool {
        self.quantity > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_fraction_is_clamped() {
        let asset = Asset::new("btc_usdt");
        assert_eq!(OrderIntent::new(asset.clone(), 1.5).target_fraction, 1.0);
        assert_eq!(OrderIntent::new(asset.clone(), -0.2).target_fraction, 0.0);
        assert_eq!(OrderIntent::new(asset, 0.4).target_fraction, 0.4);
    }

    #[test]
    fn fill_direction() {
        let fill = Fill {
            order_id: 1,
            asset: Asset::new("btc_usdt"),
            timestamp: None,
            quantity: -2.0,
            execution_price: 100.0,
            commission: 0.0,
        };
        assert!(!fill.is_buy());
    }
}

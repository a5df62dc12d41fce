//! Portfolio view port trait.

use crate::domain::asset::Asset;
use crate::domain::order::OrderHandle;

pub trait PortfolioView {
    fn cash(&self) -> f64;

    /// Orders placed but not yet resolved. Only emptiness matters to the core.
    fn open_orders(&self) -> &[OrderHandle];

    fn position_amount(&self, asset: &Asset) -> f64;
}

//! Port traits: the narrow interfaces the strategy core reads from and
//! writes to. Concrete implementations live in [`crate::adapters`].

pub mod clock_port;
pub mod config_port;
pub mod market_data_port;
pub mod metrics_port;
pub mod order_port;
pub mod portfolio_port;

//! Tradable instrument identity.

use std::fmt;
use std::sync::Arc;

/// Opaque identifier for one tradable instrument.
///
/// Resolved once from a configured pair symbol and held for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Asset {
    symbol: Arc<str>,
}

impl Asset {
    pub fn new(symbol: &str) -> Self {
        Asset {
            symbol: Arc::from(symbol),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

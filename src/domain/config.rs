//! Strategy configuration.

use crate::domain::config_validation::{require_window, validate_window_order};
use crate::domain::error::SmacrossError;
use crate::ports::config_port::ConfigPort;

/// Host-supplied parameters for one crossover run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    pub pair: String,
    pub short_window: usize,
    pub long_window: usize,
}

impl StrategyConfig {
    /// Construct directly, applying the same checks as [`StrategyConfig::from_port`].
    pub fn new(pair: &str, short_window: usize, long_window: usize) -> Result<Self, SmacrossError> {
        if pair.trim().is_empty() {
            return Err(SmacrossError::ConfigMissing {
                section: "strategy".into(),
                key: "pair".into(),
            });
        }
        for (key, value) in [("short_window", short_window), ("long_window", long_window)] {
            if value == 0 {
                return Err(SmacrossError::ConfigInvalid {
                    section: "strategy".into(),
                    key: key.into(),
                    reason: format!("{} must be at least 1", key),
                });
            }
        }
        validate_window_order(short_window, long_window)?;
        Ok(StrategyConfig {
            pair: pair.trim().to_string(),
            short_window,
            long_window,
        })
    }

    /// Read `[strategy] pair / short_window / long_window`.
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, SmacrossError> {
        let pair = config
            .get_string("strategy", "pair")
            .ok_or_else(|| SmacrossError::ConfigMissing {
                section: "strategy".into(),
                key: "pair".into(),
            })?;
        let short_window = require_window(config, "short_window")?;
        let long_window = require_window(config, "long_window")?;
        Self::new(&pair, short_window, long_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    #[test]
    fn new_valid() {
        let cfg = StrategyConfig::new("btc_usdt", 2, 4).unwrap();
        assert_eq!(cfg.pair, "btc_usdt");
        assert_eq!(cfg.short_window, 2);
        assert_eq!(cfg.long_window, 4);
    }

    #[test]
    fn new_rejects_zero_windows() {
        assert!(StrategyConfig::new("btc_usdt", 0, 4).is_err());
        assert!(StrategyConfig::new("btc_usdt", 2, 0).is_err());
    }

    #[test]
    fn new_rejects_blank_pair() {
        assert!(matches!(
            StrategyConfig::new(" ", 2, 4),
            Err(SmacrossError::ConfigMissing { .. })
        ));
    }

    #[test]
    fn windows_keep_their_configured_roles() {
        let adapter = FileConfigAdapter::from_string(
            "[strategy]\npair = eth_usdt\nshort_window = 5\nlong_window = 20\n",
        )
        .unwrap();
        let cfg = StrategyConfig::from_port(&adapter).unwrap();
        assert_eq!(cfg.short_window, 5);
        assert_eq!(cfg.long_window, 20);
    }

    #[test]
    fn from_port_missing_pair() {
        let adapter =
            FileConfigAdapter::from_string("[strategy]\nshort_window = 5\nlong_window = 20\n")
                .unwrap();
        assert!(StrategyConfig::from_port(&adapter).is_err());
    }
}

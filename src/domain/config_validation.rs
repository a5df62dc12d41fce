//! Configuration validation.
//!
//! Validates every recognised field before the first tick is processed.

use crate::domain::error::SmacrossError;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_pair(config)?;
    let short = require_window(config, "short_window")?;
    let long = require_window(config, "long_window")?;
    validate_window_order(short, long)?;
    Ok(())
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_initial_capital(config)?;
    validate_commission(config)?;
    validate_slippage(config)?;
    validate_fill_delay(config)?;
    Ok(())
}

fn validate_pair(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match config.get_string("strategy", "pair") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SmacrossError::ConfigMissing {
            section: "strategy".to_string(),
            key: "pair".to_string(),
        }),
    }
}

/// Windows have no default: a missing key is an error, not a fallback.
pub(crate) fn require_window(config: &dyn ConfigPort, key: &str) -> Result<usize, SmacrossError> {
    let raw = config
        .get_string("strategy", key)
        .ok_or_else(|| SmacrossError::ConfigMissing {
            section: "strategy".to_string(),
            key: key.to_string(),
        })?;

    let value: i64 = raw.trim().parse().map_err(|_| SmacrossError::ConfigInvalid {
        section: "strategy".to_string(),
        key: key.to_string(),
        reason: format!("{} must be an integer", key),
    })?;

    if value < 1 {
        return Err(SmacrossError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{} must be at least 1", key),
        });
    }
    Ok(value as usize)
}

pub(crate) fn validate_window_order(short: usize, long: usize) -> Result<(), SmacrossError> {
    if short >= long {
        return Err(SmacrossError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "short_window".to_string(),
            reason: "short_window must be less than long_window".to_string(),
        });
    }
    Ok(())
}

/// Parse an optional key, rejecting values that are present but malformed.
fn parse_optional<T: std::str::FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, SmacrossError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SmacrossError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("cannot parse '{}'", raw.trim()),
            }),
    }
}

fn invalid(key: &str, reason: &str) -> SmacrossError {
    SmacrossError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let value: f64 = parse_optional(config, "backtest", "initial_capital")?.unwrap_or(10_000.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid("initial_capital", "initial_capital must be positive"));
    }
    Ok(())
}

fn validate_commission(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let pct: f64 = parse_optional(config, "backtest", "commission_pct")?.unwrap_or(0.0);
    if !pct.is_finite() || pct < 0.0 {
        return Err(invalid("commission_pct", "commission_pct must be non-negative"));
    }
    Ok(())
}

fn validate_slippage(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let pct: f64 = parse_optional(config, "backtest", "slippage_pct")?.unwrap_or(0.0);
    if !pct.is_finite() || pct < 0.0 {
        return Err(invalid("slippage_pct", "slippage_pct must be non-negative"));
    }
    Ok(())
}

fn validate_fill_delay(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let bars: i64 = parse_optional(config, "backtest", "fill_delay")?.unwrap_or(0);
    if !(0..=i64::from(u32::MAX)).contains(&bars) {
        return Err(invalid("fill_delay", "fill_delay must be a non-negative bar count"));
    }
    Ok(())
}

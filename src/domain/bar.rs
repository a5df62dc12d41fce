//! One-minute OHLCV bar representation.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct MinuteBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Field selector for history and current-value lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarField {
    /// Last traded price (the bar close).
    Price,
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl MinuteBar {
    pub fn field(&self, field: BarField) -> f64 {
        match field {
            BarField::Price | BarField::Close => self.close,
            BarField::Open => self.open,
            BarField::High => self.high,
            BarField::Low => self.low,
            BarField::Volume => self.volume,
        }
    }

    /// A bar with no traded volume carries no liquidity signal.
    pub fn is_liquid(&self) -> bool {
        self.volume > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_bar() -> MinuteBar {
        MinuteBar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 12.5,
        }
    }

    #[test]
    fn price_is_close() {
        let bar = sample_bar();
        assert_eq!(bar.field(BarField::Price), 105.0);
        assert_eq!(bar.field(BarField::Close), 105.0);
    }

    #[test]
    fn field_selection() {
        let bar = sample_bar();
        assert_eq!(bar.field(BarField::Open), 100.0);
        assert_eq!(bar.field(BarField::High), 110.0);
        assert_eq!(bar.field(BarField::Low), 90.0);
        assert_eq!(bar.field(BarField::Volume), 12.5);
    }

    #[test]
    fn zero_volume_is_illiquid() {
        let mut bar = sample_bar();
        assert!(bar.is_liquid());
        bar.volume = 0.0;
        assert!(!bar.is_liquid());
    }
}

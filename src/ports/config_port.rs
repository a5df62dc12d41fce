//! Configuration access port trait.
//!
//! Sections are `[strategy]` and `[backtest]`. Typed getters fall back to
//! `default` when a key is absent or does not parse; use [`get_string`] when
//! a bad value must be reported instead.
//!
//! [`get_string`]: ConfigPort::get_string

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
}

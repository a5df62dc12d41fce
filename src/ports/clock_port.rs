//! Replay clock port trait.

use chrono::NaiveDateTime;

pub trait BarClock {
    /// Move to the next bar, returning its timestamp, or `None` when the
    /// data is exhausted.
    fn advance(&mut self) -> Option<NaiveDateTime>;
}

//! Streaming technical indicators over a newest-first time series.
//!
//! Shared conventions: `period` is the lookback window, `count` is how many
//! of the most recent output points the caller wants. When `count <= 0` or
//! the series is shorter than `period + 2` bars, the result degrades to a
//! single `0.0` rather than an error, so screening code can treat "not
//! enough data" as "false". Otherwise the result holds `count + 1` slots:
//! index 0 is the value as of the newest bar and the trailing slot is a
//! `0.0` iteration sentinel.
//!
//! The series is stored newest-first but every recurrence logically runs
//! oldest-to-newest; all of these walk the stored order with reversed
//! index arithmetic instead of physically flipping the data.

mod bollinger;
mod ema;
mod extremes;
mod macd;
mod rsi;
mod sma;

pub use bollinger::bollinger_bands;
pub use ema::{ema, ema_slice};
pub use extremes::{rolling_high, rolling_low};
pub use macd::{macd, macd_histogram};
pub use rsi::rsi;
pub use sma::sma;

/// The degenerate single-sentinel output shared by every indicator.
pub(crate) fn degenerate() -> Vec<f64> {
    vec![0.0]
}

/// True when the inputs cannot produce a full window.
pub(crate) fn undersized(rows: usize, period: usize, count: i64) -> bool {
    count <= 0 || rows as i64 <= period as i64 + 1
}

//! Simple moving average of closing prices.

use super::{degenerate, undersized};
use crate::series::TimeSeries;

/// Simple moving average over `period` closes, newest value at index 0.
///
/// The window sum is maintained incrementally: each step toward the newest
/// bar adds the newly-included close and drops the one sliding out.
pub fn sma(series: &TimeSeries, period: usize, count: i64) -> Vec<f64> {
    let rows = series.len();
    if undersized(rows, period, count) {
        return degenerate();
    }

    let count = count as usize;
    let bars = series.bars();
    let mut out = vec![0.0; count + 1];

    let start = (period + count).min(rows);
    let mut sum = 0.0;

    for row in (0..start).rev() {
        sum += bars[row].close;
        if row + period < start {
            sum -= bars[row + period].close;
            out[row] = sum / period as f64;
        }
    }

    out
}

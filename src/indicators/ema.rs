//! Exponential moving average.

use super::{degenerate, undersized};
use crate::series::TimeSeries;

/// Exponential moving average of closes with `alpha = 2 / (period + 1)`.
///
/// The recurrence is seeded with the close at the oldest computed index
/// and walked toward the newest bar; only values that have warmed up over
/// a full extra `period` of lookback are kept in the output.
pub fn ema(series: &TimeSeries, period: usize, count: i64) -> Vec<f64> {
    let rows = series.len();
    if undersized(rows, period, count) {
        return degenerate();
    }

    let count = count as usize;
    let bars = series.bars();
    let mut out = vec![0.0; count + 1];

    let alpha = 2.0 / (period as f64 + 1.0);
    let start = (period + count).min(rows - 1);
    let mut value = bars[start].close;

    for row in (0..start).rev() {
        value = alpha * bars[row].close + (1.0 - alpha) * value;
        if row + period < start {
            out[row] = value;
        }
    }

    out
}

/// The same recurrence over a raw value slice. Used for EMA-of-MACD; the
/// slice carries `rows + 1` entries so the seed can read the sentinel slot.
pub fn ema_slice(values: &[f64], rows: usize, period: usize, count: i64) -> Vec<f64> {
    if undersized(rows, period, count) {
        return degenerate();
    }

    let count = count as usize;
    let mut out = vec![0.0; count + 1];

    let alpha = 2.0 / (period as f64 + 1.0);
    let start = (period + count).min(rows);
    let mut value = values[start];

    for row in (0..start).rev() {
        value = alpha * values[row] + (1.0 - alpha) * value;
        if row + period < start {
            out[row] = value;
        }
    }

    out
}

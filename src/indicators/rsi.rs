//! Wilder's relative strength index.

use super::{degenerate, undersized};
use crate::series::TimeSeries;

/// RSI over `period` bars, newest value at index 0.
///
/// The walk runs from the oldest needed bar toward the newest: cumulative
/// gains and losses seed the first averaged window, after which Wilder
/// smoothing `avg = (prev_avg * (period - 1) + change) / period` takes
/// over. `RSI = 100 - 100 / (1 + avg_gain / avg_loss)`.
///
/// Degenerate averages: a window with no losses reads 100; a completely
/// flat window (no gains either) reads 50, the neutral midpoint.
pub fn rsi(series: &TimeSeries, period: usize, count: i64) -> Vec<f64> {
    let rows = series.len();
    if undersized(rows, period, count) {
        return degenerate();
    }

    let count = count as usize;
    let bars = series.bars();
    let mut out = vec![0.0; count + 1];

    // One extra period of Wilder warmup before results are trusted.
    let start = (2 * period + count).min(rows - 1);

    let mut gains = 0.0;
    let mut losses = 0.0;
    let mut prev_gain = 0.0;
    let mut prev_loss = 0.0;
    let mut value = 0.0;

    for row in (0..start).rev() {
        let change = bars[row].close - bars[row + 1].close;
        let (up, down) = if change < 0.0 {
            losses += -change;
            (0.0, -change)
        } else {
            gains += change;
            (change, 0.0)
        };

        let (avg_gain, avg_loss) = if row + period < start {
            (
                (prev_gain * (period as f64 - 1.0) + up) / period as f64,
                (prev_loss * (period as f64 - 1.0) + down) / period as f64,
            )
        } else {
            (gains / period as f64, losses / period as f64)
        };

        value = if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            let rs = avg_gain / avg_loss;
            100.0 - (100.0 / (1.0 + rs))
        };

        // Unwind the seed window as it slides out from under the
        // cumulative totals.
        if row + period <= start {
            let change = bars[row + period - 1].close - bars[row + period].close;
            if change < 0.0 {
                losses += change;
            } else {
                gains -= change;
            }
        }

        if row < count {
            out[row] = value;
        }

        prev_gain = avg_gain;
        prev_loss = avg_loss;
    }

    out[0] = value;

    out
}

//! Rolling high/low over the most recent bars.

use crate::series::TimeSeries;

/// Highest `high` over the newest `days` bars. `0.0` when the series
/// cannot cover the window.
pub fn rolling_high(series: &TimeSeries, days: i64) -> f64 {
    let rows = series.len();
    if days <= 0 || rows as i64 <= days + 1 {
        return 0.0;
    }

    let bars = series.bars();
    let mut ret = bars[0].high;
    for bar in &bars[..days as usize] {
        if bar.high > ret {
            ret = bar.high;
        }
    }

    ret
}

/// Lowest `low` over the newest `days` bars. `0.0` when the series cannot
/// cover the window.
pub fn rolling_low(series: &TimeSeries, days: i64) -> f64 {
    let rows = series.len();
    if days <= 0 || rows as i64 <= days + 1 {
        return 0.0;
    }

    let bars = series.bars();
    let mut ret = bars[0].low;
    for bar in &bars[..days as usize] {
        if bar.low < ret {
            ret = bar.low;
        }
    }

    ret
}

//! Moving average convergence/divergence.

use super::ema::{ema, ema_slice};
use super::{degenerate, undersized};
use crate::series::TimeSeries;

/// MACD line: `EMA(fast) - EMA(slow)`, subtracted index-wise.
pub fn macd(series: &TimeSeries, fast: usize, slow: usize, count: i64) -> Vec<f64> {
    let rows = series.len();
    if undersized(rows, slow, count) {
        return degenerate();
    }

    let count = count as usize;
    let mut out = vec![0.0; count + 1];

    let start = if slow + count < rows {
        count
    } else {
        rows - slow
    };

    let ema_fast = ema(series, fast, count as i64);
    let ema_slow = ema(series, slow, count as i64);

    for row in (0..start).rev() {
        out[row] = ema_fast[row] - ema_slow[row];
    }

    out
}

/// MACD histogram: the MACD line minus a `signal`-period EMA of the MACD
/// line itself (an EMA of an EMA difference, not of raw closes).
pub fn macd_histogram(
    series: &TimeSeries,
    fast: usize,
    slow: usize,
    signal: usize,
    count: i64,
) -> Vec<f64> {
    let rows = series.len();
    if undersized(rows, slow, count) {
        return degenerate();
    }

    let count = count as usize;
    let mut out = vec![0.0; count + 1];

    let start = if slow + count + signal < rows {
        count
    } else {
        rows - slow
    };

    // Extra signal-period of MACD history to warm the signal EMA up.
    let line = macd(series, fast, slow, (count + signal) as i64);
    let signal_line = ema_slice(&line, count + signal, signal, count as i64);

    // The signal line only carries count+1 slots; clamp in case the slow
    // window ate most of the series.
    for row in (0..start.min(count)).rev() {
        out[row] = line[row] - signal_line[row.min(signal_line.len() - 1)];
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn series_from_closes(closes: &[f64]) -> TimeSeries {
        let mut si = TimeSeries::new();
        let newest = NaiveDate::from_ymd_opt(2017, 10, 12).unwrap();
        for (i, &close) in closes.iter().enumerate() {
            let date = (newest - Duration::days(i as i64)).format("%Y-%m-%d");
            si.push(Bar::new(&date.to_string(), close, close, close, close, 1));
        }
        si
    }

    #[test]
    fn test_macd_constant_series_is_zero() {
        let si = series_from_closes(&[5.0; 80]);
        let out = macd(&si, 12, 26, 10);

        assert_eq!(out.len(), 11);
        for x in 0..10 {
            assert_relative_eq!(out[x], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let closes: Vec<f64> = (1..=120).rev().map(|v| v as f64).collect();
        let si = series_from_closes(&closes);
        let out = macd(&si, 12, 26, 5);

        // Fast EMA sits above slow EMA while price rises.
        for x in 0..5 {
            assert!(out[x] > 0.0, "macd[{}] = {}", x, out[x]);
        }
    }

    #[test]
    fn test_macd_histogram_constant_series_is_zero() {
        let si = series_from_closes(&[5.0; 120]);
        let out = macd_histogram(&si, 12, 26, 9, 10);

        assert_eq!(out.len(), 11);
        for x in 0..10 {
            assert_relative_eq!(out[x], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_macd_histogram_small_count_stays_in_bounds() {
        // slow + count + signal exceeds the series length here; the write
        // window must clamp instead of running off the output buffer.
        let si = series_from_closes(&[5.0; 30]);
        let out = macd_histogram(&si, 12, 26, 9, 1);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_macd_undersized_input() {
        let si = series_from_closes(&[5.0; 20]);
        assert_eq!(macd(&si, 12, 26, 5), vec![0.0]);
        assert_eq!(macd_histogram(&si, 12, 26, 9, 5), vec![0.0]);
    }
}

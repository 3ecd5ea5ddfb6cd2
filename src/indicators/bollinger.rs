//! Bollinger band half-widths.

use super::sma::sma;
use super::{degenerate, undersized};
use crate::series::TimeSeries;

/// Band half-width: population standard deviation of the last `period`
/// closes around the SMA at each index, times `deviations`.
///
/// Callers add/subtract the result from the SMA to get the top/bottom
/// bands; returning the half-width keeps one series serving both.
pub fn bollinger_bands(
    series: &TimeSeries,
    period: usize,
    deviations: f64,
    count: i64,
) -> Vec<f64> {
    let rows = series.len();
    if undersized(rows, period, count) {
        return degenerate();
    }

    let count = count as usize;
    let bars = series.bars();
    let mut out = vec![0.0; count + 1];

    let start = if period + count < rows {
        count
    } else {
        rows - period
    };

    let means = sma(series, period, count as i64);

    for row in (0..start).rev() {
        let mean = means[row];
        let sum: f64 = bars[row..row + period]
            .iter()
            .map(|bar| (bar.close - mean).powi(2))
            .sum();
        out[row] = (sum / period as f64).sqrt() * deviations;
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
    fn test_bollinger_constant_series_is_zero() {
        let si = series_from_closes(&[5.0; 40]);
        let out = bollinger_bands(&si, 20, 2.0, 10);

        assert_eq!(out.len(), 11);
        for x in 0..10 {
            assert_relative_eq!(out[x], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_bollinger_alternating_series() {
        // Closes alternating 4/6 around a mean of 5: population std dev 1.
        let closes: Vec<f64> = (0..40).map(|v| if v % 2 == 0 { 4.0 } else { 6.0 }).collect();
        let si = series_from_closes(&closes);
        let out = bollinger_bands(&si, 20, 2.0, 5);

        for x in 0..5 {
            assert_relative_eq!(out[x], 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bollinger_scales_with_deviations() {
        let closes: Vec<f64> = (0..40).map(|v| if v % 2 == 0 { 4.0 } else { 6.0 }).collect();
        let si = series_from_closes(&closes);
        let one = bollinger_bands(&si, 20, 1.0, 5);
        let three = bollinger_bands(&si, 20, 3.0, 5);

        for x in 0..5 {
            assert_relative_eq!(three[x], one[x] * 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_bollinger_undersized_input() {
        let si = series_from_closes(&[5.0; 21]);
        assert_eq!(bollinger_bands(&si, 20, 2.0, 5), vec![0.0]);
    }
}

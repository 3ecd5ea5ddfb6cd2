//! Calendar-driven aggregation of daily bars into coarser periods.

use crate::series::TimeSeries;
use crate::types::Bar;
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Granularity of a rollup bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

/// Step a calendar date back by `number` periods. Month and year steps use
/// calendar arithmetic, so month-end dates clamp the way chrono clamps.
fn step_back(date: NaiveDate, number: u32, period: Period) -> NaiveDate {
    match period {
        Period::Day => date - Duration::days(number as i64),
        Period::Week => date - Duration::weeks(number as i64),
        Period::Month => date - Months::new(number),
        Period::Year => date - Months::new(12 * number),
    }
}

impl TimeSeries {
    /// Compress this series into one bar per bucket of `number` consecutive
    /// `period`s, walking newest to oldest. With `align`, the anchor date
    /// snaps forward to the next occurrence of that weekday (kept as-is if
    /// already on it), so week buckets share a fixed starting weekday.
    ///
    /// The result is a brand-new series, also newest-first: each output
    /// bar's `close` comes from the newest bar of its bucket, `open`,
    /// `date` and `timestamp` from the oldest, `high`/`low` are the bucket
    /// extrema and `volume` the bucket sum.
    ///
    /// Sorts `self` as a side effect. Fewer than two bars is a no-op that
    /// returns a copy of the input.
    pub fn rollup(&mut self, number: u32, period: Period, align: Option<Weekday>) -> TimeSeries {
        if self.bars.len() < 2 {
            return self.clone();
        }

        self.sort();
        let number = number.max(1);

        let mut anchor = self.bars[0].calendar_date();
        if let Some(weekday) = align {
            while anchor.weekday() != weekday {
                anchor += Duration::days(1);
            }
        }

        log::trace!(
            "Rolling up {} bars into {}x{:?} buckets anchored at {}",
            self.bars.len(),
            number,
            period,
            anchor
        );

        let mut out = TimeSeries::new();
        let mut boundary = step_back(anchor, number, period);
        let mut current: Option<Bar> = None;

        for bar in &self.bars {
            let date = bar.calendar_date();

            // At or before the boundary means we have entered an older
            // bucket; emit the finished one and step the boundary back far
            // enough to cover any calendar gap.
            if date <= boundary {
                if let Some(done) = current.take() {
                    out.push(done);
                }
                while date <= boundary {
                    boundary = step_back(boundary, number, period);
                }
            }

            match current.as_mut() {
                None => current = Some(bar.clone()),
                Some(bucket) => {
                    if bar.high > bucket.high {
                        bucket.high = bar.high;
                    }
                    if bar.low < bucket.low {
                        bucket.low = bar.low;
                    }
                    // Walking newest to oldest, the last open written is the
                    // true period-opening price. The close stays untouched.
                    bucket.open = bar.open;
                    bucket.volume += bar.volume;
                    bucket.date = bar.date.clone();
                    bucket.timestamp = bar.timestamp;
                }
            }
        }

        if let Some(done) = current {
            out.push(done);
        }

        out
    }
}

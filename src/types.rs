//! Core types: the OHLCV bar and its date handling

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Price type (using f64 for precision)
pub type Price = f64;

/// Volume type. Daily share counts fit comfortably in an i64.
pub type Volume = i64;

/// Seconds since the Unix epoch, midnight-normalized.
pub type Timestamp = i64;

/// One period's open/high/low/close/volume record.
///
/// `timestamp` is always derived from `date`: midnight UTC of the parsed
/// calendar day, or `0` when the date is missing or unparseable. The
/// original textual date is kept for display and CSV output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: Option<String>,
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Volume,
}

impl Bar {
    /// Create a new bar, deriving the timestamp from the date string.
    pub fn new(date: &str, open: Price, high: Price, low: Price, close: Price, volume: Volume) -> Self {
        Self {
            date: Some(date.to_string()),
            timestamp: parse_bar_date(date),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Create a bar with an already-known timestamp (no date string).
    pub fn with_timestamp(
        timestamp: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            date: None,
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calendar day of this bar. Bars with a zero timestamp land on the
    /// epoch date, which keeps them sorting oldest.
    pub fn calendar_date(&self) -> NaiveDate {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
            .map(|dt| dt.date_naive())
            .unwrap_or(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
    }

    /// Check if bar is bullish
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Check if bar is bearish
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Parse `%Y-%m-%d` or `%d-%B-%y` dates into a midnight-normalized Unix
/// timestamp. Returns `0` when neither format matches.
pub fn parse_bar_date(date: &str) -> Timestamp {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date, "%d-%B-%y"));

    match parsed {
        Ok(d) => d
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or(0),
        Err(_) => {
            log::info!("Failed to parse date: {}", date);
            0
        }
    }
}

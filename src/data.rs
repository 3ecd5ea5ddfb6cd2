//! CSV ingestion and persistence for bar data.
//!
//! The on-disk form is the 6-field feed format:
//! `date,open,high,low,close,volume`, one bar per line. Provider exports
//! carry a header row plus the odd malformed line, so parsing filters
//! rather than fails: a row is ingested only when it starts with a digit
//! and actually has columns.

use crate::error::{Result, TascanError};
use crate::types::{Bar, Price, Volume};
use std::io::Write;

/// Parse newline-delimited CSV text into bars.
///
/// The first line must contain at least five commas (six fields) or the
/// input is rejected outright. Every line, the first included, is then
/// considered as data and skipped unless it starts with a digit and splits
/// into six fields. Unparseable numeric fields degrade to zero, matching
/// the lenient feed handling downstream code expects.
pub fn parse_bars(text: &str) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut bars = Vec::new();
    let mut first = true;

    for record in reader.records() {
        let record = record?;

        if first {
            first = false;
            if record.len() < 6 {
                log::error!("Not enough columns in CSV header");
                return Err(TascanError::NotEnoughColumns);
            }
        }

        let date = match record.get(0) {
            Some(d) => d,
            None => continue,
        };
        if !date.starts_with(|c: char| c.is_ascii_digit()) || record.len() < 6 {
            continue;
        }

        bars.push(Bar::new(
            date,
            parse_price(record.get(1)),
            parse_price(record.get(2)),
            parse_price(record.get(3)),
            parse_price(record.get(4)),
            parse_volume(record.get(5)),
        ));
    }

    if first {
        // Completely empty input has no header to validate.
        return Err(TascanError::NotEnoughColumns);
    }

    Ok(bars)
}

/// Write bars back out in the same 6-field form. Bars with no date are
/// skipped; they cannot round-trip.
pub fn write_bars<W: Write>(bars: &[Bar], writer: W) -> Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for bar in bars {
        let date = match &bar.date {
            Some(d) => d,
            None => continue,
        };

        out.write_record(&[
            date.clone(),
            format_price(bar.open),
            format_price(bar.high),
            format_price(bar.low),
            format_price(bar.close),
            bar.volume.to_string(),
        ])?;
    }

    out.flush()?;
    Ok(())
}

fn parse_price(field: Option<&str>) -> Price {
    field
        .and_then(|f| f.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn parse_volume(field: Option<&str>) -> Volume {
    let field = match field {
        Some(f) => f.trim(),
        None => return 0,
    };
    field
        .parse::<i64>()
        .or_else(|_| field.parse::<f64>().map(|f| f as i64))
        .unwrap_or(0)
}

/// Shortest clean rendering: whole prices drop the fraction.
fn format_price(value: Price) -> String {
    format!("{}", value)
}

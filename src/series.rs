//! The time-series container: an ordered, deduplicated, newest-first
//! collection of bars.

use crate::data::{parse_bars, write_bars};
use crate::error::{Result, TascanError};
use crate::types::Bar;
use std::fs;
use std::path::{Path, PathBuf};

/// Daily (or rolled-up) bars for one ticker, stored newest-first.
///
/// Index 0 is the most recent bar. Out-of-range reads return `None` rather
/// than an error, so callers can probe `len()` as a loop guard.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    pub(crate) bars: Vec<Bar>,
    filename: Option<PathBuf>,
    dirty: bool,
}

impl TimeSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a CSV file into a new series. Binds the filename as the default
    /// save target, then sorts and deduplicates the loaded bars.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::trace!("Reading bar data from: {}", path.display());

        let text = fs::read_to_string(path)?;
        let mut series = Self {
            bars: parse_bars(&text)?,
            filename: Some(path.to_path_buf()),
            dirty: false,
        };
        series.deduplicate();

        log::trace!("Loaded records: {}", series.len());
        Ok(series)
    }

    /// Save the series as 6-field CSV rows, one bar per line. Bars without
    /// a date are skipped. Falls back to the filename bound by `load` when
    /// `path` is `None`, and skips the write entirely (returning
    /// `Ok(false)`) when nothing changed since the last load and the target
    /// is the bound file.
    pub fn save(&self, path: Option<&Path>) -> Result<bool> {
        let target = match path.or(self.filename.as_deref()) {
            Some(p) => p,
            None => {
                log::trace!("No filename provided. Unable to save.");
                return Err(TascanError::NoFilename);
            }
        };

        if !self.dirty && Some(target) == self.filename.as_deref() {
            log::trace!("No changes since we read the file. Skipping save operation.");
            return Ok(false);
        }

        log::trace!("Writing bar data to: {}", target.display());
        let file = fs::File::create(target)?;
        write_bars(&self.bars, file)?;

        Ok(true)
    }

    /// Number of bars in the series.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Read access by index, 0 = newest. Returns `None` past the end.
    pub fn get(&self, index: usize) -> Option<&Bar> {
        if index >= self.bars.len() {
            if self.bars.is_empty() {
                log::trace!("Tried to access record {} but no records exist!", index);
            } else {
                log::trace!(
                    "Tried to access record {} but highest record is {}!",
                    index,
                    self.bars.len() - 1
                );
            }
            return None;
        }
        Some(&self.bars[index])
    }

    /// The underlying bars, newest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Whether the series has been modified since the last load.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Append a bar, deriving its timestamp from its date if unset.
    pub fn push(&mut self, bar: Bar) {
        self.bars.push(Self::normalize(bar));
        self.dirty = true;
    }

    /// Insert a bar at `pos` (default callers use 0 = newest), shifting
    /// later elements up by one. `pos` past the end appends.
    pub fn insert_at(&mut self, bar: Bar, pos: usize) {
        let pos = pos.min(self.bars.len());
        self.bars.insert(pos, Self::normalize(bar));
        self.dirty = true;
    }

    /// Remove and return the newest bar. Used to walk the series back one
    /// day at a time when back-testing; deliberately leaves the dirty flag
    /// alone so the truncated series is never auto-saved.
    pub fn shift(&mut self) -> Option<Bar> {
        if self.bars.is_empty() {
            return None;
        }
        Some(self.bars.remove(0))
    }

    /// Sort by timestamp, descending (newest first). Bars with a zero
    /// timestamp (unparseable dates) end up oldest.
    pub fn sort(&mut self) {
        self.bars.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }

    /// Sort, then drop neighbor bars sharing a timestamp. The later element
    /// of each duplicate pair is the one kept. Any removal marks the series
    /// dirty so the cleaned data gets saved.
    pub fn deduplicate(&mut self) {
        self.sort();

        let mut x = 0;
        while x + 1 < self.bars.len() {
            if self.bars[x].timestamp == self.bars[x + 1].timestamp {
                log::info!("Removing duplicate: {}", x);
                self.bars.remove(x);
                self.dirty = true;
            } else {
                x += 1;
            }
        }
    }

    fn normalize(mut bar: Bar) -> Bar {
        if bar.timestamp == 0 {
            if let Some(date) = &bar.date {
                bar.timestamp = crate::types::parse_bar_date(date);
            }
        }
        bar
    }
}

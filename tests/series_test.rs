//! Integration tests for the time-series container: CSV round-trips,
//! ordering invariants, and rollup behavior.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use tascan::{Bar, Period, TascanError, TimeSeries};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const SAMPLE_CSV: &str = "Date,Open,High,Low,Close,Volume\n\
    2017-10-12,2,3,1,3,4\n\
    2017-10-11,3,7,3,3,3\n\
    2017-10-10,4,6,3,4,1\n\
    2017-10-09,2,4,2,3,2\n";

#[test]
fn test_load_sorts_and_binds_filename() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let si = TimeSeries::load(&path).unwrap();
    assert_eq!(si.len(), 4);
    assert_eq!(si.get(0).unwrap().date.as_deref(), Some("2017-10-12"));
    assert_eq!(si.get(3).unwrap().date.as_deref(), Some("2017-10-09"));
    assert!(si.get(4).is_none());
    assert!(!si.is_dirty());

    // Clean series targeting its own file: the save is skipped.
    assert!(!si.save(None).unwrap());
}

#[test]
fn test_load_missing_file_fails() {
    assert!(TimeSeries::load("no-such-file.csv").is_err());
}

#[test]
fn test_save_requires_a_filename() {
    let mut si = TimeSeries::new();
    si.push(Bar::new("2017-10-09", 2.0, 4.0, 2.0, 3.0, 2));

    assert!(matches!(si.save(None), Err(TascanError::NoFilename)));
}

#[test]
fn test_save_and_reload_round_trip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let mut si = TimeSeries::load(&path).unwrap();
    si.push(Bar::new("2017-10-13", 3.0, 5.0, 2.0, 4.0, 6));
    si.sort();

    let out = dir.path().join("out.csv");
    assert!(si.save(Some(&out)).unwrap());

    let reloaded = TimeSeries::load(&out).unwrap();
    assert_eq!(reloaded.len(), 5);
    assert_eq!(reloaded.get(0).unwrap().date.as_deref(), Some("2017-10-13"));
    assert_eq!(reloaded.get(0).unwrap().volume, 6);
    for x in 0..reloaded.len() {
        assert_eq!(reloaded.get(x).unwrap(), si.get(x).unwrap());
    }
}

#[test]
fn test_load_deduplicates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dup.csv");
    std::fs::write(
        &path,
        "Date,Open,High,Low,Close,Volume\n\
         2017-10-09,2,4,2,3,2\n\
         2017-10-09,9,9,9,9,9\n\
         2017-10-10,4,6,3,4,1\n",
    )
    .unwrap();

    let si = TimeSeries::load(&path).unwrap();
    assert_eq!(si.len(), 2);
    // A removal counts as a modification worth saving back.
    assert!(si.is_dirty());
}

#[test]
fn test_shift_walks_back_for_backtesting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walk.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let mut si = TimeSeries::load(&path).unwrap();
    let newest = si.shift().unwrap();
    assert_eq!(newest.date.as_deref(), Some("2017-10-12"));
    assert_eq!(si.len(), 3);
    assert_eq!(si.get(0).unwrap().date.as_deref(), Some("2017-10-11"));
    // Walking back is not a data change; nothing to re-save.
    assert!(!si.is_dirty());
}

#[test]
fn test_identity_rollup_matches_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("id.csv");
    std::fs::write(&path, SAMPLE_CSV).unwrap();

    let mut si = TimeSeries::load(&path).unwrap();
    let daily = si.rollup(1, Period::Day, None);

    assert_eq!(daily.len(), si.len());
    for x in 0..si.len() {
        assert_eq!(daily.get(x).unwrap(), si.get(x).unwrap());
    }
}

#[test]
fn test_weekly_rollup_scenario() {
    let mut si = TimeSeries::new();
    si.push(Bar::new("2017-10-09", 2.0, 4.0, 2.0, 3.0, 2));
    si.push(Bar::new("2017-10-10", 4.0, 6.0, 3.0, 4.0, 1));
    si.push(Bar::new("2017-10-11", 3.0, 7.0, 3.0, 3.0, 3));
    si.push(Bar::new("2017-10-12", 2.0, 3.0, 1.0, 3.0, 4));

    let weekly = si.rollup(1, Period::Week, None);

    assert_eq!(weekly.len(), 1);
    let bar = weekly.get(0).unwrap();
    assert_eq!(
        (bar.open, bar.high, bar.low, bar.close, bar.volume),
        (2.0, 7.0, 1.0, 3.0, 10)
    );
}

proptest! {
    #[test]
    fn prop_sort_dedup_is_strictly_descending(offsets in proptest::collection::vec(0u16..2000, 0..64)) {
        let epoch = NaiveDate::from_ymd_opt(2010, 1, 4).unwrap();
        let mut si = TimeSeries::new();
        for (i, &off) in offsets.iter().enumerate() {
            let date = (epoch + Duration::days(off as i64)).format("%Y-%m-%d").to_string();
            si.push(Bar::new(&date, 1.0 + i as f64, 2.0 + i as f64, 1.0, 1.5, i as i64));
        }

        si.deduplicate();

        for x in 1..si.len() {
            prop_assert!(si.get(x - 1).unwrap().timestamp > si.get(x).unwrap().timestamp);
        }
    }

    #[test]
    fn prop_rollup_preserves_totals(offsets in proptest::collection::vec(0u16..400, 2..48)) {
        // Whatever the bucketing, rolled-up volume must sum to the input
        // volume and the extrema must bound every input bar.
        let epoch = NaiveDate::from_ymd_opt(2015, 1, 5).unwrap();
        let mut si = TimeSeries::new();
        for (i, &off) in offsets.iter().enumerate() {
            let date = (epoch + Duration::days(off as i64)).format("%Y-%m-%d").to_string();
            si.push(Bar::new(&date, 2.0, 3.0 + (i % 7) as f64, 1.0, 2.5, 10 + i as i64));
        }
        si.deduplicate();

        let total: i64 = si.bars().iter().map(|b| b.volume).sum();
        let high = si.bars().iter().map(|b| b.high).fold(f64::MIN, f64::max);

        let weekly = si.rollup(1, Period::Week, None);

        let rolled_total: i64 = weekly.bars().iter().map(|b| b.volume).sum();
        let rolled_high = weekly.bars().iter().map(|b| b.high).fold(f64::MIN, f64::max);

        prop_assert_eq!(total, rolled_total);
        prop_assert_eq!(high, rolled_high);
        for x in 1..weekly.len() {
            prop_assert!(weekly.get(x - 1).unwrap().timestamp > weekly.get(x).unwrap().timestamp);
        }
    }
}

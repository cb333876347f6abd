use chrono::NaiveDate;
use std::env;
use std::fs;
use std::path::PathBuf;
use tickersync::data::csv_loader::load_bars_from_csv;

fn temp_csv_path(name: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("tickersync_{name}.csv"));
    path
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
}

#[test]
fn loads_sorts_and_dedups_rows() {
    let path = temp_csv_path("loads_sorts");
    let content = "\
date,open,high,low,close,volume
2025-10-17,101.0,101.6,100.2,100.9,287654
2025-10-16,100.5,101.8,99.9,101.0,312456
2025-10-16,100.6,101.9,99.8,101.1,999999
";
    fs::write(&path, content).expect("write temp csv");

    let bars = load_bars_from_csv(path.to_str().expect("path")).expect("load");

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].date, date("2025-10-16"));
    assert_eq!(bars[0].close, 101.1);
    assert_eq!(bars[0].volume, 999999);
    assert_eq!(bars[1].date, date("2025-10-17"));

    let _ = fs::remove_file(&path);
}

#[test]
fn rejects_invalid_ohlc_rows() {
    let path = temp_csv_path("rejects_invalid");
    let content = "\
date,open,high,low,close,volume
2025-10-16,100.5,99.0,99.9,101.0,312456
";
    fs::write(&path, content).expect("write temp csv");

    assert!(load_bars_from_csv(path.to_str().expect("path")).is_err());

    let _ = fs::remove_file(&path);
}

#[test]
fn rejects_negative_volume() {
    let path = temp_csv_path("rejects_negative_volume");
    let content = "\
date,open,high,low,close,volume
2025-10-16,100.5,101.8,99.9,101.0,-5
";
    fs::write(&path, content).expect("write temp csv");

    assert!(load_bars_from_csv(path.to_str().expect("path")).is_err());

    let _ = fs::remove_file(&path);
}

use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tickersync::config::Config;
use tickersync::data::provider_loader::{fetch_window, parse_stooq_csv, parse_vci_history};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
}

#[test]
fn parses_vci_history() {
    let path = fixture_path("vci_history.json");
    let content = fs::read_to_string(&path).expect("read fixture");
    let bars = parse_vci_history(&content).expect("parse");

    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].date, date("2025-10-16"));
    assert_eq!(bars[2].date, date("2025-10-18"));
    assert_eq!(bars[0].close, 101000.0);
    assert_eq!(bars[2].close, 101200.0);
    assert_eq!(bars[2].volume, 345678);
}

#[test]
fn parses_vci_history_with_string_numbers() {
    let payload = r#"[{"symbol":"FPT","t":["1760572800"],"o":["100500"],"h":["101800"],"l":["99900"],"c":["101000"],"v":["312456"]}]"#;
    let bars = parse_vci_history(payload).expect("parse");

    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].date, date("2025-10-16"));
    assert_eq!(bars[0].open, 100500.0);
    assert_eq!(bars[0].volume, 312456);
}

#[test]
fn empty_vci_payload_yields_no_bars() {
    assert!(parse_vci_history("[]").expect("parse").is_empty());

    let payload = r#"[{"symbol":"FPT","t":[],"o":[],"h":[],"l":[],"c":[],"v":[]}]"#;
    assert!(parse_vci_history(payload).expect("parse").is_empty());
}

#[test]
fn rejects_vci_column_length_mismatch() {
    let payload = r#"[{"symbol":"FPT","t":[1760572800,1760659200],"o":[100500],"h":[101800,101600],"l":[99900,100200],"c":[101000,100900],"v":[312456,287654]}]"#;
    assert!(parse_vci_history(payload).is_err());
}

#[test]
fn rejects_vci_missing_column() {
    let payload = r#"[{"symbol":"FPT","t":[1760572800],"o":[100500]}]"#;
    assert!(parse_vci_history(payload).is_err());
}

#[test]
fn parses_stooq_daily_csv() {
    let path = fixture_path("stooq_daily.csv");
    let content = fs::read_to_string(&path).expect("read fixture");
    let bars = parse_stooq_csv(&content).expect("parse");

    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].date, date("2025-10-16"));
    assert_eq!(bars[1].close, 100.9);
    assert_eq!(bars[2].volume, 345678);
}

#[test]
fn stooq_no_data_yields_no_bars() {
    assert!(parse_stooq_csv("No data").expect("parse").is_empty());
    assert!(parse_stooq_csv("").expect("parse").is_empty());
}

#[test]
fn rejects_unexpected_stooq_payload() {
    assert!(parse_stooq_csv("<html>rate limited</html>").is_err());
}

#[test]
fn fetch_window_uses_explicit_dates() {
    let mut config = Config::default();
    config.fetch.start_date = Some("2020-08-10".to_string());
    config.fetch.end_date = Some("2025-08-07".to_string());

    let (start, end) = fetch_window(&config).expect("window");

    assert_eq!(start, date("2020-08-10"));
    assert_eq!(end, date("2025-08-07"));
}

#[test]
fn fetch_window_rejects_inverted_range() {
    let mut config = Config::default();
    config.fetch.start_date = Some("2025-08-07".to_string());
    config.fetch.end_date = Some("2020-08-10".to_string());

    assert!(fetch_window(&config).is_err());
}

use tickersync::config::Config;

#[test]
fn default_config_is_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_empty_symbol() {
    let mut config = Config::default();
    config.symbol = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn rejects_unknown_data_source() {
    let mut config = Config::default();
    config.data.source = "ftp".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn rejects_csv_source_without_path() {
    let mut config = Config::default();
    config.data.source = "csv".to_string();
    config.data.csv_path = None;
    assert!(config.validate().is_err());

    config.data.csv_path = Some("data/FPT_daily.csv".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_unknown_provider() {
    let mut config = Config::default();
    config.fetch.provider = "bloomberg".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn rejects_zero_days_without_explicit_range() {
    let mut config = Config::default();
    config.fetch.days = 0;
    assert!(config.validate().is_err());

    config.fetch.start_date = Some("2024-01-01".to_string());
    config.fetch.end_date = Some("2024-06-30".to_string());
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_zero_tail_rows() {
    let mut config = Config::default();
    config.display.tail_rows = 0;
    assert!(config.validate().is_err());
}

#[test]
fn rejects_unknown_output_format() {
    let mut config = Config::default();
    config.output.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn rejects_unsafe_table_identifier() {
    let mut config = Config::default();
    config.storage.table = "price_bars; DROP TABLE users".to_string();
    assert!(config.validate().is_err());

    config.storage.table = "1prices".to_string();
    assert!(config.validate().is_err());

    config.storage.table = "fpt_stock_2025".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_unknown_load_mode() {
    let mut config = Config::default();
    config.storage.load_mode = "merge".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn storage_checks_are_skipped_when_disabled() {
    let mut config = Config::default();
    config.storage.enabled = false;
    config.storage.load_mode = "merge".to_string();
    config.storage.postgres_dsn = String::new();
    assert!(config.validate().is_ok());
}

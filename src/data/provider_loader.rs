use crate::config::Config;
use crate::data::{normalize_series, parse_date};
use crate::models::PriceBar;
use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use csv::ReaderBuilder;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 500;

pub fn load_bars_from_provider(config: &Config) -> Result<Vec<PriceBar>> {
    let (start, end) = fetch_window(config)?;
    let provider = config.fetch.provider.to_lowercase();
    match provider.as_str() {
        "vci" => load_vci_bars(config, start, end),
        "stooq" => load_stooq_bars(config, start, end),
        _ => Err(Error::new("market data provider not implemented")),
    }
}

pub fn fetch_window(config: &Config) -> Result<(NaiveDate, NaiveDate)> {
    let end = match &config.fetch.end_date {
        Some(value) => parse_date(value)?,
        None => Utc::now().date_naive(),
    };
    let start = match &config.fetch.start_date {
        Some(value) => parse_date(value)?,
        None => end - Duration::days(i64::from(config.fetch.days)),
    };
    if start > end {
        return Err(Error::new("fetch.start_date must be <= end_date"));
    }
    Ok((start, end))
}

fn load_vci_bars(config: &Config, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
    let base_url = config
        .fetch
        .base_url
        .as_deref()
        .unwrap_or("https://trading.vietcap.com.vn");
    let client = http_client()?;

    let url = format!("{base_url}/api/chart/OHLCChart/gap-chart");
    let body = json!({
        "timeFrame": "ONE_DAY",
        "symbols": [config.symbol],
        "from": day_start_epoch(start)?,
        "to": day_end_epoch(end)?,
    });
    let text = fetch_text_with_retry(|| client.post(&url).json(&body).send())?;
    let bars = parse_vci_history(&text)?;
    Ok(normalize_series(bars))
}

fn load_stooq_bars(config: &Config, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
    let base_url = config
        .fetch
        .base_url
        .as_deref()
        .unwrap_or("https://stooq.com");
    let client = http_client()?;

    let url = format!("{base_url}/q/d/l/");
    let query = vec![
        ("s".to_string(), config.symbol.to_lowercase()),
        ("d1".to_string(), start.format("%Y%m%d").to_string()),
        ("d2".to_string(), end.format("%Y%m%d").to_string()),
        ("i".to_string(), "d".to_string()),
    ];
    let text = fetch_text_with_retry(|| client.get(&url).query(&query).send())?;
    let bars = parse_stooq_csv(&text)?;
    Ok(normalize_series(bars))
}

pub fn parse_vci_history(payload: &str) -> Result<Vec<PriceBar>> {
    let data: Value = serde_json::from_str(payload)
        .map_err(|err| Error::new(format!("json parse failed: {err}")))?;

    let series = match &data {
        Value::Array(items) => match items.first() {
            Some(item) => item,
            None => return Ok(Vec::new()),
        },
        Value::Object(_) => &data,
        _ => return Err(Error::new("unexpected history payload shape")),
    };

    let times = column_array(series, "t")?;
    if times.is_empty() {
        return Ok(Vec::new());
    }
    let opens = column_array(series, "o")?;
    let highs = column_array(series, "h")?;
    let lows = column_array(series, "l")?;
    let closes = column_array(series, "c")?;
    let volumes = column_array(series, "v")?;

    let len = times.len();
    for (name, column) in [
        ("o", &opens),
        ("h", &highs),
        ("l", &lows),
        ("c", &closes),
        ("v", &volumes),
    ] {
        if column.len() != len {
            return Err(Error::new(format!(
                "history column {name} length mismatch"
            )));
        }
    }

    let mut bars = Vec::with_capacity(len);
    for index in 0..len {
        let epoch = value_to_i64(&times[index])?;
        let date = DateTime::from_timestamp(epoch, 0)
            .ok_or_else(|| Error::new("invalid bar timestamp"))?
            .date_naive();
        let volume = value_to_f64(&volumes[index])?;
        if volume < 0.0 {
            return Err(Error::new("volume must be non-negative"));
        }
        bars.push(PriceBar::new(
            date,
            value_to_f64(&opens[index])?,
            value_to_f64(&highs[index])?,
            value_to_f64(&lows[index])?,
            value_to_f64(&closes[index])?,
            volume.round() as i64,
        )?);
    }

    Ok(bars)
}

#[derive(serde::Deserialize)]
struct StooqRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

pub fn parse_stooq_csv(payload: &str) -> Result<Vec<PriceBar>> {
    let trimmed = payload.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("no data") {
        return Ok(Vec::new());
    }
    if !trimmed.starts_with("Date") {
        return Err(Error::new("unexpected daily csv payload"));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(trimmed.as_bytes());

    let mut bars = Vec::new();
    for result in reader.deserialize::<StooqRow>() {
        let row = result.map_err(|err| Error::new(format!("csv parse failed: {err}")))?;
        let date = parse_date(&row.date)?;
        let volume = row.volume.unwrap_or(0.0);
        if volume < 0.0 {
            return Err(Error::new("volume must be non-negative"));
        }
        bars.push(PriceBar::new(
            date,
            row.open,
            row.high,
            row.low,
            row.close,
            volume.round() as i64,
        )?);
    }

    Ok(bars)
}

fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|err| Error::new(format!("http client build failed: {err}")))
}

fn fetch_text_with_retry<F>(send: F) -> Result<String>
where
    F: Fn() -> reqwest::Result<reqwest::blocking::Response>,
{
    let mut attempt = 0;
    loop {
        match send() {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response
                        .text()
                        .map_err(|err| Error::new(format!("http read failed: {err}")));
                }

                if should_retry(status) && attempt < MAX_RETRIES {
                    let delay = retry_delay_ms(&response, attempt, BASE_DELAY_MS);
                    std::thread::sleep(std::time::Duration::from_millis(delay));
                    attempt += 1;
                    continue;
                }

                return Err(Error::new(format!("provider response status: {status}")));
            }
            Err(err) => {
                if attempt < MAX_RETRIES {
                    let delay = BASE_DELAY_MS * (1_u64 << attempt);
                    std::thread::sleep(std::time::Duration::from_millis(delay));
                    attempt += 1;
                    continue;
                }
                return Err(Error::new(format!("http request failed: {err}")));
            }
        }
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_delay_ms(response: &reqwest::blocking::Response, attempt: u32, base_ms: u64) -> u64 {
    if let Some(value) = response.headers().get("retry-after") {
        if let Ok(text) = value.to_str() {
            if let Ok(seconds) = text.parse::<u64>() {
                return seconds.saturating_mul(1000);
            }
        }
    }
    base_ms * (1_u64 << attempt)
}

fn day_start_epoch(date: NaiveDate) -> Result<i64> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::new("invalid fetch window date"))?;
    Ok(midnight.and_utc().timestamp())
}

fn day_end_epoch(date: NaiveDate) -> Result<i64> {
    Ok(day_start_epoch(date)? + 86_399)
}

fn column_array<'a>(series: &'a Value, key: &str) -> Result<&'a Vec<Value>> {
    series
        .get(key)
        .and_then(|value| value.as_array())
        .ok_or_else(|| Error::new(format!("history column {key} missing")))
}

fn value_to_i64(value: &Value) -> Result<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .ok_or_else(|| Error::new("number is not i64")),
        Value::String(text) => text
            .parse::<i64>()
            .map_err(|err| Error::new(format!("invalid i64: {err}"))),
        _ => Err(Error::new("unexpected value type for i64")),
    }
}

fn value_to_f64(value: &Value) -> Result<f64> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| Error::new("number is not f64")),
        Value::String(text) => text
            .parse::<f64>()
            .map_err(|err| Error::new(format!("invalid f64: {err}"))),
        _ => Err(Error::new("unexpected value type for f64")),
    }
}

use crate::models::PriceBar;
use chrono::NaiveDate;
use std::fmt::Write;

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSummary {
    pub symbol: String,
    pub last_close: f64,
    pub change: f64,
    pub percent_change: f64,
    pub average_volume: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub day_count: usize,
}

pub fn summarize(symbol: &str, bars: &[PriceBar]) -> Option<SeriesSummary> {
    let first = bars.first()?;
    let last = bars.last()?;

    let prev_close = if bars.len() >= 2 {
        bars[bars.len() - 2].close
    } else {
        last.close
    };
    let change = last.close - prev_close;
    let percent_change = if prev_close == 0.0 {
        0.0
    } else {
        change / prev_close * 100.0
    };

    let average_volume =
        bars.iter().map(|bar| bar.volume as f64).sum::<f64>() / bars.len() as f64;
    let period_high = bars.iter().map(|bar| bar.high).fold(f64::MIN, f64::max);
    let period_low = bars.iter().map(|bar| bar.low).fold(f64::MAX, f64::min);

    Some(SeriesSummary {
        symbol: symbol.to_string(),
        last_close: last.close,
        change,
        percent_change,
        average_volume,
        period_high,
        period_low,
        first_date: first.date,
        last_date: last.date,
        day_count: bars.len(),
    })
}

pub fn render_summary(summary: &SeriesSummary, bars: &[PriceBar], tail_rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} daily price summary", summary.symbol);
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(out, "last close:     {}", format_thousands(summary.last_close));
    let _ = writeln!(
        out,
        "change:         {} ({:+.2}%)",
        format_signed_thousands(summary.change),
        summary.percent_change
    );
    let _ = writeln!(
        out,
        "average volume: {}",
        format_thousands(summary.average_volume)
    );
    let _ = writeln!(
        out,
        "period high:    {}",
        format_thousands(summary.period_high)
    );
    let _ = writeln!(
        out,
        "period low:     {}",
        format_thousands(summary.period_low)
    );
    let _ = writeln!(
        out,
        "sessions:       {} ({} to {})",
        summary.day_count, summary.first_date, summary.last_date
    );
    let _ = writeln!(out, "{}", "=".repeat(50));

    let _ = writeln!(out, "\nlatest rows:");
    let _ = writeln!(
        out,
        "{:>8} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "date", "open", "high", "low", "close", "volume"
    );
    let skip = bars.len().saturating_sub(tail_rows);
    for bar in &bars[skip..] {
        let _ = writeln!(
            out,
            "{:>8} {:>12} {:>12} {:>12} {:>12} {:>14}",
            bar.date.format("%d/%m").to_string(),
            format_thousands(bar.open),
            format_thousands(bar.high),
            format_thousands(bar.low),
            format_thousands(bar.close),
            format_thousands(bar.volume as f64)
        );
    }

    out
}

pub fn format_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let body: String = grouped.chars().rev().collect();
    if rounded < 0 {
        format!("-{body}")
    } else {
        body
    }
}

pub fn format_signed_thousands(value: f64) -> String {
    let formatted = format_thousands(value);
    if value.round() as i64 >= 0 {
        format!("+{formatted}")
    } else {
        formatted
    }
}

use crate::app::report::write_output;
use crate::app::summary::{render_summary, summarize};
use crate::config::Config;
use crate::data::load_bars;
use crate::loader::{run_append, run_replace, LoadOutcome};
use crate::storage::postgres::PostgresStore;
use crate::{Error, Result};
use std::env;
use tracing::{info, warn};

pub fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    if cli.show_help {
        print_usage();
        return Ok(());
    }

    let mut config = Config::load(&cli.config_path)?;
    if let Some(symbol) = cli.symbol_override {
        config.symbol = symbol;
    }
    if let Some(days) = cli.days_override {
        config.fetch.days = days;
    }
    if let Some(mode) = cli.load_mode_override {
        config.storage.load_mode = mode;
    }
    if let Some(format) = cli.output_format {
        config.output.format = format;
    }
    if let Some(path) = cli.output_path {
        config.output.path = path;
    }
    config.validate()?;

    let bars = load_bars(&config)?;
    if bars.is_empty() {
        warn!(symbol = %config.symbol, "fetch returned no rows");
        println!("no data for {}, nothing to do", config.symbol);
        return Ok(());
    }
    info!(symbol = %config.symbol, rows = bars.len(), "fetched daily bars");

    let summary = summarize(&config.symbol, &bars)
        .ok_or_else(|| Error::new("summary requires a non-empty series"))?;
    print!("{}", render_summary(&summary, &bars, config.display.tail_rows));

    if config.output.format != "none" {
        write_output(&config.output.path, &config.output.format, &summary, &bars)?;
        println!(
            "output_written: {} ({})",
            config.output.path, config.output.format
        );
    }

    if !config.storage.enabled {
        info!("storage disabled, skipping persistence");
        return Ok(());
    }

    let mut store = PostgresStore::connect(&config.storage)?;
    let outcome = match config.storage.load_mode.as_str() {
        "replace" => run_replace(&mut store, &bars)?,
        _ => run_append(&mut store, &bars)?,
    };
    report_outcome(&config, &outcome);

    Ok(())
}

fn report_outcome(config: &Config, outcome: &LoadOutcome) {
    let table = config.storage.table.as_str();
    match outcome {
        LoadOutcome::TableCreated { rows } => {
            info!(table, rows, "created table and wrote full series");
            println!("created table {table} with {rows} rows");
        }
        LoadOutcome::Appended { rows } => {
            info!(table, rows, "appended delta");
            println!("appended {rows} new rows to {table}");
        }
        LoadOutcome::NothingNew => {
            info!(table, "no new rows");
            println!("table {table} already up to date, nothing new");
        }
        LoadOutcome::Replaced { rows } => {
            info!(table, rows, "replaced table contents");
            println!("replaced table {table} with {rows} rows");
        }
    }
}

struct CliArgs {
    config_path: String,
    symbol_override: Option<String>,
    days_override: Option<u32>,
    load_mode_override: Option<String>,
    output_format: Option<String>,
    output_path: Option<String>,
    show_help: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut config_path = "config.toml".to_string();
    let mut symbol_override = None;
    let mut days_override = None;
    let mut load_mode_override = None;
    let mut output_format = None;
    let mut output_path = None;
    let mut show_help = false;

    let mut index = 1;
    while index < args.len() {
        match args[index].as_str() {
            "--help" | "-h" => {
                show_help = true;
                index += 1;
            }
            "--config" | "-c" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::new("missing value for --config"))?;
                config_path = value.to_string();
                index += 2;
            }
            "--symbol" | "-s" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::new("missing value for --symbol"))?;
                symbol_override = Some(value.to_string());
                index += 2;
            }
            "--days" | "-d" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::new("missing value for --days"))?;
                let parsed = value
                    .parse::<u32>()
                    .map_err(|_| Error::new("invalid value for --days"))?;
                days_override = Some(parsed);
                index += 2;
            }
            "--load-mode" | "-m" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::new("missing value for --load-mode"))?;
                load_mode_override = Some(value.to_string());
                index += 2;
            }
            "--output-format" | "-f" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::new("missing value for --output-format"))?;
                output_format = Some(value.to_string());
                index += 2;
            }
            "--output-path" | "-o" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| Error::new("missing value for --output-path"))?;
                output_path = Some(value.to_string());
                index += 2;
            }
            unknown => {
                return Err(Error::new(format!("unknown argument: {unknown}")));
            }
        }
    }

    Ok(CliArgs {
        config_path,
        symbol_override,
        days_override,
        load_mode_override,
        output_format,
        output_path,
        show_help,
    })
}

fn print_usage() {
    println!("usage: tickersync [--config <path>] [--symbol <SYMBOL>] [--days <n>] [--load-mode <mode>] [--output-format <fmt>] [--output-path <path>]");
    println!("  -c, --config   Path to config.toml (default: config.toml)");
    println!("  -s, --symbol   Override symbol from config");
    println!("  -d, --days     Override fetch window length in days");
    println!("  -m, --load-mode       Override load mode (append|replace)");
    println!("  -f, --output-format   Override output format (none|json|csv)");
    println!("  -o, --output-path     Override output path");
    println!("  -h, --help     Show this help");
}

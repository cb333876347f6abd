fn main() {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();
    tickersync::app::logging::init();
    if let Err(err) = tickersync::app::cli::run() {
        eprintln!("error: {}", err.message);
        std::process::exit(1);
    }
}

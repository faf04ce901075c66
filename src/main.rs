use clap::Parser;

use guestlist::cli::{self, Cli};
use guestlist::config::Config;
use guestlist::logging;

fn main() {
    // Loads .env before clap reads its env-backed flags.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(2);
        }
    };
    logging::init(config.log_format);

    let cli = Cli::parse();

    std::process::exit(cli::run(cli, config));
}

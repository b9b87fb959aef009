//! coasterlab - headless demo runner
//!
//! Usage: `coasterlab [coaster|springs|boids|curve] [path]`

use std::path::PathBuf;
use std::process::ExitCode;

use coasterlab::config::{AppConfig, DemoKind};
use coasterlab::demos;

fn main() -> ExitCode {
    // Load configuration before logging so the configured level applies
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting coasterlab");
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let mut args = std::env::args().skip(1);
    let kind = match args.next() {
        Some(name) => match DemoKind::from_name(&name) {
            Some(kind) => kind,
            None => {
                log::error!("Unknown demo '{}' (expected coaster, springs, boids or curve)", name);
                return ExitCode::FAILURE;
            }
        },
        None => config.demo.kind,
    };
    let path = args.next().map(PathBuf::from);

    match demos::run_demo(kind, &config, path.as_deref()) {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

//! Headless demo game of the Ember engine

use std::error::Error;

use semver::Version;

use ember_rs::{Config, InputScript};

mod logger;

const APP_NAME: &str = env!("CARGO_PKG_NAME", "binary must be compiled by Cargo");
const APP_VERSION_STR: &str = env!("CARGO_PKG_VERSION", "binary must be compiled by Cargo");

/// Entry point of the `ember-rs` demo
fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    let version = Version::parse(APP_VERSION_STR)?;
    let config = Config::new(APP_NAME.to_string(), version).with_log_directory("logs");

    let _handle = logger::init(config.log_level(), config.log_directory())?;
    log::info!("logger initialized successfully");

    let summary = ember_rs::run(config, InputScript::demo())?;
    log::info!(
        "{} frames done: {} entities alive, {} collisions, {} hits",
        summary.frames,
        summary.entities,
        summary.collisions,
        summary.hits,
    );
    Ok(())
}

#![allow(non_snake_case)]

use std::env;

use clap::Parser;
use smartScheduler::cli::{self, Cli};
use smartScheduler::config::{AppConfig, RunMode, Settings};
use smartScheduler::runtime;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = match env::var("CONFIG_FILE") {
        Ok(path) => AppConfig::from_file(&path).unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    };

    let get_prop = |key: &str| -> Option<String> {
        config.get(key).or_else(|| env::var(key).ok())
    };

    let settings = match Settings::from_lookup(get_prop) {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    match settings.run_mode {
        RunMode::Api => runtime::run_api(settings).await,
        RunMode::Cli => cli::cli(settings, Cli::parse()).await,
    }
}

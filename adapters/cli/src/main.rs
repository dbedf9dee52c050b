#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a Pomo Patch garden.

mod config;
mod demo;
mod driver;
mod script;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pomo_patch_service::{bootstrap_account, LocalEconomy};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::GardenConfig;
use driver::Driver;

/// Grow a Pomo Patch garden against the local economy service.
#[derive(Debug, Parser)]
#[command(name = "pomo-patch", version, about)]
struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Account to play as, overriding the configuration.
    #[arg(long)]
    email: Option<String>,
    /// Seed of the service rolls and demo choices, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Plays work and break cycles automatically.
    Demo {
        /// Number of work sessions to complete.
        #[arg(long, default_value_t = 4)]
        cycles: u32,
    },
    /// Replays a line-based action script.
    Run {
        /// Script to replay.
        script: PathBuf,
    },
}

/// Entry point for the Pomo Patch command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GardenConfig::load(path)?,
        None => GardenConfig::default(),
    };
    if let Some(email) = cli.email {
        config.account.email = email;
    }
    if let Some(seed) = cli.seed {
        config.local.seed = seed;
    }

    let mut service = LocalEconomy::new(config.rules.clone(), config.local.clone())
        .into_client(&config.account.email);
    let account = bootstrap_account(&mut service).context("failed to bootstrap account")?;
    info!(
        email = %config.account.email,
        money = account.money,
        plant_limit = account.plant_limit,
        "account ready"
    );
    let mut driver = Driver::new(&config, account, service);

    match cli.mode {
        Mode::Demo { cycles } => demo::run(&mut driver, config.local.seed, cycles),
        Mode::Run { script } => {
            let text = fs::read_to_string(&script)
                .with_context(|| format!("failed to read script {}", script.display()))?;
            let lines = script::parse(&text)
                .with_context(|| format!("failed to parse script {}", script.display()))?;
            driver.run_script(&lines)?;
        }
    }

    println!("{}", driver.summary());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

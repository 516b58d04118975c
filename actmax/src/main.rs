//! # actmax
//!
//! Loads a value network for an environment, takes the environment's initial
//! observation (or noise) and optimizes that observation to maximize the
//! network's value estimate, writing periodic PNG snapshots when `--out-dir`
//! is given.

mod app;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = app::Args::parse();
    app::run(&args).map(|_| ())
}

/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Main executable for parlu-rs

use anyhow::Context;
use clap::Parser;
use parlu_rs::cli::{render_report, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.run_config().context("failed to load configuration")?;
    log::debug!("running with {:?}", config);

    let report = parlu_rs::ParLu::with_config(config.clone())
        .run(&cli.dimension_source())
        .context("distributed inversion failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, config.print));
    }

    Ok(())
}

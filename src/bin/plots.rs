use anyhow::Context;
use clap::Parser;
use log::info;

use repeatfall::params::PlotsParams;
use repeatfall::{pipeline, Config};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = PlotsParams::parse();
    let config = Config::load(params.config.as_ref()).context("loading config")?;

    let report = pipeline::plots(&params, &config)?;
    info!(
        "Done: {} merged rows, {} stratified waterfalls",
        report.merged_rows,
        report.waterfalls.len()
    );
    Ok(())
}

use anyhow::Context;
use clap::Parser;

use repeatfall::params::SummarizeParams;
use repeatfall::{pipeline, Config};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = SummarizeParams::parse();
    let config = Config::load(params.config.as_ref()).context("loading config")?;

    pipeline::summarize(&params, &config)?;
    Ok(())
}

use clap::Parser;

use repeatfall::params::Fastq2TsvParams;
use repeatfall::pipeline;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let params = Fastq2TsvParams::parse();
    pipeline::fastq2tsv(&params)?;
    Ok(())
}

//! The three pipeline stages behind the binaries.

use std::path::PathBuf;

use log::{info, warn};

use crate::annotate::Annotator;
use crate::config::Config;
use crate::errors::*;
use crate::fastq::*;
use crate::params::*;
use crate::summary::*;
use crate::table::*;
use crate::waterfall::*;

pub const FASTQ_TSV: &str = "fastq.tsv";
pub const MERGED_ONTARGET_TSV: &str = "merged.ontarget.tsv";
pub const FASTQ_ONTARGET_TSV: &str = "fastq.ontarget.tsv";
pub const PROCESSED_TSV: &str = "merged.ontarget.processed.tsv";
pub const RAW_WATERFALL_PNG: &str = "waterfall.png";

pub fn fastq2tsv(params: &Fastq2TsvParams) -> Result<ConversionSummary> {
    info!("fastq_path: {}", params.fastq_path.display());
    info!("output_path: {}", params.output_path.display());
    fastqs_to_tsv(&params.fastq_path, &params.output_path)
}

/// What the plotting stage produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotsReport {
    pub merged_rows: usize,
    /// `None` when no raw read was short enough to draw.
    pub raw_waterfall: Option<PathBuf>,
    pub processed: [BucketStats; 2],
    pub waterfalls: Vec<PathBuf>,
}

fn count_direction(table: &Table, direction: &str) -> Result<usize> {
    let col = table.column("direction")?;
    Ok(table.rows().iter().filter(|r| r[col] == direction).count())
}

/// Merge reads with their on-target annotations, draw the raw waterfall,
/// then summarise and draw the processed inserts.
pub fn plots(params: &PlotsParams, config: &Config) -> Result<PlotsReport> {
    let annotator = Annotator::new(&config.motif)?;

    let reads = Table::from_fastq_tsv(params.fastq_tsv_path.join(FASTQ_TSV))?;
    let columns = config
        .ontarget_columns
        .as_ref()
        .map(|c| c.iter().map(String::as_str).collect::<Vec<_>>());
    let ontarget = Table::from_tsv(
        params.merged_ontarget_path.join(MERGED_ONTARGET_TSV),
        columns.as_deref(),
    )?;
    info!(
        "{} reads, {} on-target ({} fwd, {} rev)",
        reads.len(),
        ontarget.len(),
        count_direction(&ontarget, "fwd")?,
        count_direction(&ontarget, "rev")?
    );

    let merged = reads.outer_join(&ontarget, "id")?;
    merged.write_tsv(params.raw_ontarget_merged_path.join(FASTQ_ONTARGET_TSV))?;

    let raw_reads = flanked_reads(&merged)?;
    if raw_reads.len() < merged.len() {
        warn!(
            "{} merged rows have no read sequence",
            merged.len() - raw_reads.len()
        );
    }

    let raw_path = params.images_path.join(RAW_WATERFALL_PNG);
    let raw_waterfall = render_raw(
        &raw_reads,
        &annotator,
        &config.raw_waterfall,
        &raw_path,
    )?
    .then_some(raw_path);

    let processed = Table::from_tsv(params.processed_path.join(PROCESSED_TSV), None)?;
    let records = processed_records(&processed, &config.waterfall.sequence_field)?;
    let stats = repeat_unit_stats(&records, &config.summary);

    let waterfalls = render_stratified(
        &records,
        &config.waterfall,
        annotator.rev_motif(),
        &params.images_path,
    )?;

    Ok(PlotsReport {
        merged_rows: merged.len(),
        raw_waterfall,
        processed: stats,
        waterfalls,
    })
}

/// Where `summarize` writes its count and percentage tables.
pub fn summary_paths(params: &SummarizeParams) -> [PathBuf; 2] {
    let place = |suffix: &str| {
        let sibling = sibling_path(&params.strat_process_output, suffix);
        match &params.output_dir_path {
            Some(dir) => dir.join(sibling.file_name().unwrap_or_default()),
            None => sibling,
        }
    };
    [place("_output.csv"), place("_output_percents.csv")]
}

pub fn summarize(params: &SummarizeParams, config: &Config) -> Result<SampleSummary> {
    let lambda = LambdaSummary::from_tsv(&params.lambda_alignment_summary)?;
    let table = Table::from_tsv(&params.strat_process_output, None)?;
    let len_field = format!("len_{}", config.waterfall.sequence_field);
    let records = length_records(&table, &len_field)?;

    let sample = params
        .sample
        .clone()
        .unwrap_or_else(|| sample_name(&params.strat_process_output));
    let summary = SampleSummary::new(sample, lambda, &records, &config.summary);

    let [counts, percents] = summary_paths(params);
    write_row_csv(&counts, &summary.counts_row())?;
    write_row_csv(&percents, &summary.percents_row())?;

    info!(
        "Sample {}: {} on-target reads, {} wild type, {} expanded",
        summary.sample,
        summary.on_target.total(),
        summary.wt.total(),
        summary.exp.total()
    );
    info!("Wrote {} and {}", counts.display(), percents.display());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_paths_follow_output_dir() {
        let mut params = SummarizeParams {
            lambda_alignment_summary: "summary.tsv".into(),
            strat_process_output: "/res/S1/strat.processed.tsv".into(),
            output_dir_path: None,
            sample: None,
            config: None,
        };
        assert_eq!(
            summary_paths(&params),
            [
                PathBuf::from("/res/S1/strat_output.csv"),
                PathBuf::from("/res/S1/strat_output_percents.csv")
            ]
        );

        params.output_dir_path = Some("/out".into());
        assert_eq!(summary_paths(&params)[1], PathBuf::from("/out/strat_output_percents.csv"));
    }
}

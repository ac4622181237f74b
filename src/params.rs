use std::path::PathBuf;

use clap::Parser;

/// Command line of `fastq2tsv`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fastq2tsv",
    about = "Collect merged FASTQ(.gz) files into one seq/id table",
    version
)]
pub struct Fastq2TsvParams {
    /// Directory containing the merged FASTQ(.gz) files
    #[arg(long = "fastq_path")]
    pub fastq_path: PathBuf,

    /// Output table, gzip compressed when the name ends in .gz
    #[arg(long = "output_path")]
    pub output_path: PathBuf,
}

/// Command line of `plots`. Each input flag names the directory holding the
/// stage's fixed file name.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "plots",
    about = "Merge on-target reads and render waterfall images",
    version
)]
pub struct PlotsParams {
    /// Directory containing fastq.tsv
    #[arg(long = "fastq_tsv_path")]
    pub fastq_tsv_path: PathBuf,

    /// Directory containing merged.ontarget.tsv
    #[arg(long = "merged_ontarget_path")]
    pub merged_ontarget_path: PathBuf,

    /// Directory receiving fastq.ontarget.tsv
    #[arg(long = "raw_ontarget_merged_path")]
    pub raw_ontarget_merged_path: PathBuf,

    /// Directory receiving waterfall.png; also the base of the stratified
    /// <images_path>.wtrf.50.png and <images_path>.wtrf.51.png
    #[arg(long = "images_path")]
    pub images_path: PathBuf,

    /// Directory containing merged.ontarget.processed.tsv
    #[arg(long = "processed_path")]
    pub processed_path: PathBuf,

    /// YAML file overriding the default motif, thresholds and scales
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Command line of `summarize`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "summarize",
    about = "Per-sample read counts and repeat length percentiles",
    version
)]
pub struct SummarizeParams {
    /// Headerless Read_type/Count table of the lambda control alignment
    #[arg(long = "lambda_alignment_summary")]
    pub lambda_alignment_summary: PathBuf,

    /// Processed on-target table of one sample
    #[arg(long = "strat_process_output")]
    pub strat_process_output: PathBuf,

    /// Directory receiving the CSV tables [default: next to the processed table]
    #[arg(long = "output_dir_path")]
    pub output_dir_path: Option<PathBuf>,

    /// Sample name [default: directory holding the processed table]
    #[arg(long = "sample")]
    pub sample: Option<String>,

    /// YAML file overriding the default thresholds and percentiles
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse<P: Parser>(name: &str, args: &[&str]) -> P {
        let mut full = vec![name];
        full.extend_from_slice(args);
        P::parse_from(full)
    }

    #[test]
    fn fastq2tsv_flags() {
        let p: Fastq2TsvParams = parse(
            "fastq2tsv",
            &["--fastq_path", "/data/fastqs", "--output_path", "/out/fastq.tsv.gz"],
        );
        assert_eq!(p.fastq_path, PathBuf::from("/data/fastqs"));
        assert_eq!(p.output_path, PathBuf::from("/out/fastq.tsv.gz"));
    }

    #[test]
    fn plots_flags() {
        let p: PlotsParams = parse(
            "plots",
            &[
                "--fastq_tsv_path",
                "a",
                "--merged_ontarget_path",
                "b",
                "--raw_ontarget_merged_path",
                "c",
                "--images_path",
                "d",
                "--processed_path",
                "e",
            ],
        );
        assert_eq!(p.images_path, PathBuf::from("d"));
        assert_eq!(p.processed_path, PathBuf::from("e"));
        assert!(p.config.is_none());
    }

    #[test]
    fn plots_requires_every_directory() {
        let res = PlotsParams::try_parse_from(["plots", "--fastq_tsv_path", "a"]);
        assert!(res.is_err());
    }

    #[test]
    fn summarize_optional_flags() {
        let p: SummarizeParams = parse(
            "summarize",
            &[
                "--lambda_alignment_summary",
                "summary.tsv",
                "--strat_process_output",
                "./results/S1/strat.tsv",
                "--sample",
                "S1",
            ],
        );
        assert_eq!(p.sample.as_deref(), Some("S1"));
        assert!(p.output_dir_path.is_none());
    }
}

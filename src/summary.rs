//! Read counts and repeat length percentiles per sample.

use std::path::{Path, PathBuf};

use log::info;

use crate::config::SummaryConfig;
use crate::errors::*;
use crate::read::*;
use crate::sample::Bucket;
use crate::table::Table;

/// Nucleotides per repeat unit.
pub const UNIT_LEN: f64 = 3.0;

/// Linear interpolation between closest ranks, `p` in `0..=100`.
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Reads that did and did not align to the lambda control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LambdaSummary {
    pub aligned: u64,
    pub unaligned: u64,
}

impl LambdaSummary {
    /// Headerless `Read_type\tCount` table with `Aligned` and `Unaligned` rows.
    pub fn from_tsv(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let table = Table::from_tsv(file, Some(&["Read_type", "Count"][..]))?;
        let context = file.display().to_string();

        let count = |read_type: &str| -> Result<u64> {
            let row = table
                .rows()
                .iter()
                .find(|r| r[0] == read_type)
                .ok_or_else(|| Error::malformed(&context, format!("no \"{read_type}\" row")))?;
            row[1]
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|c| *c >= 0.0 && c.fract() == 0.0)
                .map(|c| c as u64)
                .ok_or_else(|| {
                    Error::malformed(&context, format!("bad {read_type} count \"{}\"", row[1]))
                })
        };

        Ok(Self {
            aligned: count("Aligned")?,
            unaligned: count("Unaligned")?,
        })
    }

    pub fn total(&self) -> u64 {
        self.aligned + self.unaligned
    }

    /// Denominator for percentages; `-1` marks a run without any lambda counts.
    pub fn denominator(&self) -> i64 {
        if self.total() == 0 {
            -1
        } else {
            self.total() as i64
        }
    }
}

/// Counts of one group of reads, split by direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionCounts {
    pub fwd: usize,
    pub rev: usize,
}

impl DirectionCounts {
    pub fn total(&self) -> usize {
        self.fwd + self.rev
    }

    fn add(&mut self, direction: Direction) {
        match direction {
            Direction::Fwd => self.fwd += 1,
            Direction::Rev => self.rev += 1,
        }
    }
}

/// One side of a length threshold: its reads and their length percentiles.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub bucket: Bucket,
    pub counts: DirectionCounts,
    /// `(p, value)` pairs; `value` is `None` for an empty bucket.
    pub percentiles: Vec<(f64, Option<f64>)>,
}

/// Split `(length, direction)` pairs by `threshold` and summarise each side.
pub fn bucket_stats(
    lengths: &[(f64, Direction)],
    threshold: f64,
    percentiles: &[f64],
) -> [BucketStats; 2] {
    Bucket::split(threshold).map(|bucket| {
        let mut counts = DirectionCounts::default();
        let mut values = Vec::new();
        for &(len, direction) in lengths.iter().filter(|(len, _)| bucket.contains(*len)) {
            counts.add(direction);
            values.push(len);
        }
        let values = sorted(values);

        BucketStats {
            bucket,
            counts,
            percentiles: percentiles
                .iter()
                .map(|&p| (p, percentile(&values, p)))
                .collect(),
        }
    })
}

/// Processed insert statistics in repeat units (`len / 3`), logged by the
/// plotting stage.
pub fn repeat_unit_stats(records: &[ReadRecord], config: &SummaryConfig) -> [BucketStats; 2] {
    let lengths = records
        .iter()
        .map(|r| (r.len as f64 / UNIT_LEN, r.direction))
        .collect::<Vec<_>>();
    let stats = bucket_stats(&lengths, config.repeat_threshold, &config.percentiles);

    for s in &stats {
        info!(
            "{:?} repeat units: {} fwd, {} rev, percentiles {:?}",
            s.bucket, s.counts.fwd, s.counts.rev, s.percentiles
        );
    }
    stats
}

/// Per-sample summary of on-target reads.
///
/// Wild type alleles are inserts shorter than the allele threshold in
/// nucleotides, expanded alleles are the rest. Percentiles are reported in
/// repeat units.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSummary {
    pub sample: String,
    pub lambda: LambdaSummary,
    pub on_target: DirectionCounts,
    pub wt: DirectionCounts,
    pub exp: DirectionCounts,
    pub wt_percentiles: Vec<(f64, Option<f64>)>,
    pub exp_percentiles: Vec<(f64, Option<f64>)>,
}

impl SampleSummary {
    pub fn new(
        sample: impl Into<String>,
        lambda: LambdaSummary,
        records: &[ReadRecord],
        config: &SummaryConfig,
    ) -> Self {
        let mut on_target = DirectionCounts::default();
        let mut wt = DirectionCounts::default();
        let mut exp = DirectionCounts::default();
        let mut wt_lens = Vec::new();
        let mut exp_lens = Vec::new();

        for r in records {
            let len = r.len as f64;
            on_target.add(r.direction);
            if len < config.allele_threshold {
                wt.add(r.direction);
                wt_lens.push(len / UNIT_LEN);
            } else {
                exp.add(r.direction);
                exp_lens.push(len / UNIT_LEN);
            }
        }

        let pcts = |lens: Vec<f64>| {
            let lens = sorted(lens);
            config
                .percentiles
                .iter()
                .map(|&p| (p, percentile(&lens, p)))
                .collect::<Vec<_>>()
        };

        Self {
            sample: sample.into(),
            lambda,
            on_target,
            wt,
            exp,
            wt_percentiles: pcts(wt_lens),
            exp_percentiles: pcts(exp_lens),
        }
    }

    fn percentile_cells(&self) -> Vec<(String, String)> {
        let fmt = |v: &Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        let mut cells = Vec::new();
        for (name, pcts) in [("Wt", &self.wt_percentiles), ("Exp", &self.exp_percentiles)] {
            for (p, v) in pcts {
                cells.push((format!("{name}_{p}th"), fmt(v)));
            }
        }
        cells
    }

    /// Header and values of the raw count table.
    pub fn counts_row(&self) -> Vec<(String, String)> {
        let mut cells = vec![
            ("Sample", self.sample.clone()),
            ("Total_reads", self.lambda.total().to_string()),
            ("Lambda_reads", self.lambda.aligned.to_string()),
            ("Non-lambda_reads", self.lambda.unaligned.to_string()),
            ("Total on-target reads", self.on_target.total().to_string()),
            ("Fwd reads", self.on_target.fwd.to_string()),
            ("Rev reads", self.on_target.rev.to_string()),
            ("Wt reads", self.wt.total().to_string()),
            ("Exp reads", self.exp.total().to_string()),
            ("Wt_fwd", self.wt.fwd.to_string()),
            ("Wt_rev", self.wt.rev.to_string()),
            ("Exp_fwd", self.exp.fwd.to_string()),
            ("Exp_rev", self.exp.rev.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect::<Vec<_>>();

        cells.extend(self.percentile_cells());
        cells
    }

    /// Header and values of the table where counts carry their share of the total.
    pub fn percents_row(&self) -> Vec<(String, String)> {
        let lambda_total = self.lambda.denominator();
        let on_target = self.on_target.total() as i64;

        let mut cells = vec![
            ("Sample", self.sample.clone()),
            ("Total_reads", self.lambda.total().to_string()),
            ("Lambda_reads", with_percent(self.lambda.aligned, lambda_total)),
            ("Non-lambda_reads", with_percent(self.lambda.unaligned, lambda_total)),
            ("On-target reads", with_percent(self.on_target.total() as u64, on_target)),
            ("Wt reads", with_percent(self.wt.total() as u64, on_target)),
            ("Exp reads", with_percent(self.exp.total() as u64, on_target)),
            ("Wt_fwd", with_percent(self.wt.fwd as u64, on_target)),
            ("Wt_rev", with_percent(self.wt.rev as u64, on_target)),
            ("Exp_fwd", with_percent(self.exp.fwd as u64, on_target)),
            ("Exp_rev", with_percent(self.exp.rev as u64, on_target)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect::<Vec<_>>();

        cells.extend(self.percentile_cells());
        cells
    }
}

/// `"n (p%)"`, or just `"n"` when there is nothing to divide by.
pub fn with_percent(n: u64, total: i64) -> String {
    if total <= 0 {
        n.to_string()
    } else {
        format!("{n} ({:.2}%)", 100.0 * n as f64 / total as f64)
    }
}

/// Write one header line and one value line as CSV.
pub fn write_row_csv(file: impl AsRef<Path>, row: &[(String, String)]) -> Result<()> {
    let file = file.as_ref();

    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::file_io(file, e))?;
    }

    let mut writer = csv::Writer::from_path(file).map_err(|e| Error::file_io(file, e))?;
    writer
        .write_record(row.iter().map(|(k, _)| k))
        .map_err(|e| Error::file_io(file, e))?;
    writer
        .write_record(row.iter().map(|(_, v)| v))
        .map_err(|e| Error::file_io(file, e))?;
    writer.flush().map_err(|e| Error::file_io(file, e))?;
    Ok(())
}

/// `dir/name.a.b` with `suffix` becomes `dir/name<suffix>`.
pub fn sibling_path(file: impl AsRef<Path>, suffix: &str) -> PathBuf {
    let file = file.as_ref();
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .unwrap_or_default();
    file.with_file_name(format!("{name}{suffix}"))
}

/// Name of the directory holding `file`, which is where each sample's
/// results live.
pub fn sample_name(file: impl AsRef<Path>) -> String {
    file.as_ref()
        .parent()
        .and_then(|p| p.file_name())
        .or_else(|| file.as_ref().file_stem())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

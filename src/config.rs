//! Tunable constants, optionally loaded from a YAML file.
//!
//! Every field has a default, so a config file only needs to list what it
//! changes:
//! ```yaml
//! motif: GAA
//! waterfall:
//!   threshold: 200
//!   short:
//!     stretch: 11
//! ```

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::*;

/// Horizontal scale and gridline thickness of one stratified image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scale {
    pub stretch: u32,
    pub grid: u32,
}

impl Scale {
    pub const SHORT: Scale = Scale {
        stretch: 15,
        grid: 2,
    };
    pub const LONG: Scale = Scale {
        stretch: 7,
        grid: 1,
    };
}

/// A scale as written in a config file, where either field may be left out.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScaleOverride {
    stretch: Option<u32>,
    grid: Option<u32>,
}

impl ScaleOverride {
    fn over(self, base: Scale) -> Scale {
        Scale {
            stretch: self.stretch.unwrap_or(base.stretch),
            grid: self.grid.unwrap_or(base.grid),
        }
    }
}

fn short_scale<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Scale, D::Error> {
    Ok(ScaleOverride::deserialize(d)?.over(Scale::SHORT))
}

fn long_scale<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Scale, D::Error> {
    Ok(ScaleOverride::deserialize(d)?.over(Scale::LONG))
}

/// Stratified waterfalls of processed inserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaterfallConfig {
    /// Column holding the insert sequence; its length lives in `len_<field>`.
    pub sequence_field: String,
    /// Insert length in nucleotides separating the two images.
    pub threshold: f64,
    /// Widest row drawn, in nucleotides.
    pub width_cap: usize,
    pub sample_size: usize,
    pub seed: u64,
    /// Missing fields fall back to [`Scale::SHORT`].
    #[serde(deserialize_with = "short_scale")]
    pub short: Scale,
    /// Missing fields fall back to [`Scale::LONG`].
    #[serde(deserialize_with = "long_scale")]
    pub long: Scale,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            sequence_field: "ins_ext_aln".to_owned(),
            threshold: 150.0,
            width_cap: 1500,
            sample_size: 1000,
            seed: 42,
            short: Scale::SHORT,
            long: Scale::LONG,
        }
    }
}

/// Single unstratified waterfall of annotated raw reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawWaterfallConfig {
    pub sample_size: usize,
    pub max_len: usize,
    pub seed: u64,
}

impl Default for RawWaterfallConfig {
    fn default() -> Self {
        Self {
            sample_size: 4000,
            max_len: 3500,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    /// Repeat units (`len_<field> / 3`) separating the processed statistics buckets.
    pub repeat_threshold: f64,
    /// Insert length in nucleotides separating wild type from expanded alleles.
    pub allele_threshold: f64,
    pub percentiles: Vec<f64>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            repeat_threshold: 150.0,
            allele_threshold: 150.0,
            percentiles: vec![10.0, 50.0, 90.0],
        }
    }
}

/// Columns of the headerless on-target table written by the k-mer stage.
pub const ONTARGET_COLUMNS: [&str; 9] = [
    "direction",
    "id",
    "prefix_flank",
    "ins",
    "suffix_flank",
    "start_cnt",
    "start_stdev",
    "end_cnt",
    "end_stdev",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub motif: String,
    /// Column names of `merged.ontarget.tsv`, which has no header line. `null`
    /// reads the names from the first line instead.
    pub ontarget_columns: Option<Vec<String>>,
    pub waterfall: WaterfallConfig,
    pub raw_waterfall: RawWaterfallConfig,
    pub summary: SummaryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            motif: "CTG".to_owned(),
            ontarget_columns: Some(ONTARGET_COLUMNS.iter().map(|&c| c.to_owned()).collect()),
            waterfall: WaterfallConfig::default(),
            raw_waterfall: RawWaterfallConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        let text = std::fs::read_to_string(file).map_err(|e| Error::file_io(file, e))?;
        serde_yaml::from_str(&text).map_err(|e| Error::Config {
            file: file.display().to_string(),
            source: e,
        })
    }

    /// Defaults when `file` is `None`.
    pub fn load(file: Option<impl AsRef<Path>>) -> Result<Self> {
        match file {
            Some(f) => Self::from_file(f),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "motif: GAA").unwrap();
        writeln!(file, "waterfall:").unwrap();
        writeln!(file, "  threshold: 200").unwrap();
        writeln!(file, "  long:").unwrap();
        writeln!(file, "    stretch: 5").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.motif, "GAA");
        assert_eq!(config.waterfall.threshold, 200.0);
        assert_eq!(config.waterfall.long, Scale { stretch: 5, grid: 1 });
        assert_eq!(config.waterfall.short, Scale::SHORT);
        assert_eq!(config.raw_waterfall, RawWaterfallConfig::default());
    }

    #[test]
    fn partial_scales_keep_their_own_bucket_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "waterfall:").unwrap();
        writeln!(file, "  short:").unwrap();
        writeln!(file, "    grid: 3").unwrap();
        writeln!(file, "  long:").unwrap();
        writeln!(file, "    stretch: 9").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.waterfall.short, Scale { stretch: 15, grid: 3 });
        assert_eq!(config.waterfall.long, Scale { stretch: 9, grid: 1 });
    }

    #[test]
    fn ontarget_columns_can_be_read_from_header() {
        let config = Config::default();
        assert_eq!(config.ontarget_columns.as_ref().map(|c| c.len()), Some(9));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ontarget_columns: null").unwrap();
        assert_eq!(Config::from_file(file.path()).unwrap().ontarget_columns, None);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ontarget_columns: [id, direction]").unwrap();
        assert_eq!(
            Config::from_file(file.path()).unwrap().ontarget_columns,
            Some(vec!["id".to_owned(), "direction".to_owned()])
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "motiff: GAA").unwrap();
        assert!(matches!(
            Config::from_file(file.path()),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn no_file_means_defaults() {
        let config = Config::load(None::<&Path>).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.waterfall.seed, 42);
    }
}

//! Waterfall images: one row per read, one stretched column per base.
//!
//! Two flavors are drawn:
//! * processed inserts, split by length into two images, stretched horizontally,
//!   colored against the repeating reference motif and overlaid with gridlines
//!   every 3, 30 and 300 bases;
//! * annotated raw reads, one pixel per token, each row centred.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::annotate::Annotator;
use crate::canvas::Canvas;
use crate::config::*;
use crate::errors::*;
use crate::order::*;
use crate::palette::*;
use crate::read::*;
use crate::sample::*;

/// One stratified image: which reads go in, how they are scaled and the tag
/// appended to the output path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stratum {
    pub bucket: Bucket,
    pub scale: Scale,
    pub tag: &'static str,
}

pub fn strata(config: &WaterfallConfig) -> [Stratum; 2] {
    let [short, long] = Bucket::split(config.threshold);
    [
        Stratum {
            bucket: short,
            scale: config.short,
            tag: "50",
        },
        Stratum {
            bucket: long,
            scale: config.long,
            tag: "51",
        },
    ]
}

/// `<base>.wtrf.<tag>.png`
pub fn stratum_path(base: impl AsRef<Path>, tag: &str) -> PathBuf {
    let mut path = OsString::from(base.as_ref().as_os_str());
    path.push(format!(".wtrf.{tag}.png"));
    PathBuf::from(path)
}

fn to_u32(v: usize, what: &str) -> Result<u32> {
    u32::try_from(v).map_err(|_| Error::malformed("waterfall", format!("{what} {v} is too large")))
}

/// Draw processed inserts: forward block, separator, reverse block.
///
/// Rows are cut at `min(width_cap, longest len)` bases. Each base `j` is a
/// `stretch` wide cell centred on column `stretch * (j + 1)`, black when it
/// matches `reference[j % reference.len()]`.
pub fn draw_processed(
    records: &[ReadRecord],
    scale: Scale,
    width_cap: usize,
    reference: &[u8],
) -> Result<Canvas> {
    let width = records
        .iter()
        .map(|r| r.len)
        .max()
        .unwrap_or(0)
        .min(width_cap);
    let rows = split_block(records, width);

    let stretch = scale.stretch.max(1);
    let canvas_width = to_u32(width, "width")?
        .checked_mul(stretch)
        .and_then(|w| w.checked_add(stretch))
        .ok_or_else(|| Error::malformed("waterfall", "stretched width overflows"))?;
    let mut canvas = Canvas::new(canvas_width, to_u32(rows.len(), "height")?, GREY);

    for (y, row) in rows.iter().enumerate() {
        let y = y as u32;
        for (j, &token) in row.iter().take(width).enumerate() {
            let x = stretch * (j as u32 + 1);
            canvas.draw_vertical_line(x, y, y + 1, stretch, cell_color(token, j, reference))?;
        }
    }

    canvas.overlay_grid(stretch, scale.grid)?;
    Ok(canvas)
}

pub fn render(
    records: &[ReadRecord],
    scale: Scale,
    width_cap: usize,
    reference: &[u8],
    output: impl AsRef<Path>,
) -> Result<()> {
    draw_processed(records, scale, width_cap, reference)?.save(output)
}

/// Sample each length bucket and render it to `<base>.wtrf.<tag>.png`.
///
/// Buckets without reads are skipped. Returns the paths that were written.
pub fn render_stratified(
    records: &[ReadRecord],
    config: &WaterfallConfig,
    reference: &[u8],
    base: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for stratum in strata(config) {
        let sampled = sample_bucket(
            records,
            |r| stratum.bucket.contains(r.len as f64),
            config.sample_size,
            config.seed,
        );

        if sampled.is_empty() {
            info!("No reads in length bucket {:?}, skipping its waterfall", stratum.bucket);
            continue;
        }

        let path = stratum_path(&base, stratum.tag);
        render(&sampled, stratum.scale, config.width_cap, reference, &path)?;
        info!(
            "Rendered {} sampled reads in length bucket {:?} to {}",
            sampled.len(),
            stratum.bucket,
            path.display()
        );
        written.push(path);
    }

    Ok(written)
}

/// Draw annotated rows one pixel per token, each row centred in the widest.
pub fn draw_annotated(rows: &[AnnotatedRow]) -> Result<Canvas> {
    let width = rows.iter().map(|r| r.tokens.len()).max().unwrap_or(0);
    let mut canvas = Canvas::new(
        to_u32(width, "width")?,
        to_u32(rows.len(), "height")?,
        GREY,
    );

    for (y, row) in rows.iter().enumerate() {
        let left = (width - row.tokens.len()) / 2;
        for (j, &token) in row.tokens.iter().enumerate() {
            canvas.set_point((left + j) as u32, y as u32, color(token))?;
        }
    }

    Ok(canvas)
}

/// Sample raw reads, annotate them and draw them ordered by directionality.
///
/// Returns `false` without writing anything when no read qualifies.
pub fn render_raw(
    reads: &[FlankedRead],
    annotator: &Annotator,
    config: &RawWaterfallConfig,
    output: impl AsRef<Path>,
) -> Result<bool> {
    let eligible = reads
        .iter()
        .filter(|r| !r.is_empty() && r.len() <= config.max_len)
        .collect::<Vec<_>>();

    if eligible.is_empty() {
        info!("No reads of at most {} bases, skipping raw waterfall", config.max_len);
        return Ok(false);
    }

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let rows = sample_with(&eligible, config.sample_size, &mut rng)
        .into_iter()
        .map(|r| {
            let tokens = annotator.annotate(
                &r.seq,
                r.prefix_flank.as_deref(),
                r.suffix_flank.as_deref(),
            );
            AnnotatedRow::new(r.seq.clone(), tokens)
        })
        .collect::<Vec<_>>();

    let rows = score_split(rows);
    draw_annotated(&rows)?.save(output.as_ref())?;

    info!(
        "Rendered {} sampled raw reads to {}",
        rows.len(),
        output.as_ref().display()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::*;

    fn rec(seq: &str, direction: Direction) -> ReadRecord {
        ReadRecord::new("r", seq.as_bytes().to_vec(), direction)
    }

    fn two_reads() -> Vec<ReadRecord> {
        vec![
            rec("CTGCTGCAG", Direction::Fwd),
            rec("CAGCAGCAG", Direction::Rev),
        ]
    }

    #[test]
    fn processed_rows_are_colored_against_reference() {
        let scale = Scale {
            stretch: 15,
            grid: 2,
        };
        let canvas = draw_processed(&two_reads(), scale, 1500, b"CAG").unwrap();
        assert_eq!((canvas.width(), canvas.height()), (9 * 15 + 15, 3));

        // base 1 of each row spans columns 23..38
        assert_eq!(canvas.pixel(30, 0), Some(color(b'T')));
        assert_eq!(canvas.pixel(20, 0), Some(BLACK));
        assert_eq!(canvas.pixel(30, 1), Some(color(SEPARATOR)));
        assert_eq!(canvas.pixel(30, 2), Some(BLACK));
        // left margin and gridlines
        assert_eq!(canvas.pixel(2, 0), Some(GREY));
        assert_eq!(canvas.pixel(52, 2), Some(LIGHT_GREY));
        assert_eq!(canvas.pixel(7, 1), Some(BLACK));
    }

    #[test]
    fn width_is_capped() {
        let records = vec![
            rec(&"CAG".repeat(20), Direction::Fwd),
            rec("CAG", Direction::Fwd),
        ];
        let scale = Scale {
            stretch: 2,
            grid: 1,
        };
        let canvas = draw_processed(&records, scale, 10, b"CAG").unwrap();
        assert_eq!(canvas.width(), 10 * 2 + 2);
        assert_eq!(canvas.height(), 2);
    }

    #[test]
    fn stratum_paths() {
        assert_eq!(
            stratum_path("/out/images", "50"),
            PathBuf::from("/out/images.wtrf.50.png")
        );
    }

    #[test]
    fn empty_bucket_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("images");
        let written =
            render_stratified(&two_reads(), &WaterfallConfig::default(), b"CAG", &base).unwrap();

        assert_eq!(written, vec![stratum_path(&base, "50")]);
        assert!(written[0].exists());
        assert!(!stratum_path(&base, "51").exists());

        let img = image::open(&written[0]).unwrap();
        assert_eq!(img.width(), 150);
        // 1000 sampled rows plus the separator
        assert_eq!(img.height(), 1001);
    }

    #[test]
    fn long_reads_use_the_long_scale() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("images");
        let long = rec(&"CAG".repeat(60), Direction::Fwd);
        let config = WaterfallConfig {
            sample_size: 10,
            ..WaterfallConfig::default()
        };

        let written = render_stratified(&[long], &config, b"CAG", &base).unwrap();
        assert_eq!(written, vec![stratum_path(&base, "51")]);

        let img = image::open(&written[0]).unwrap();
        assert_eq!((img.width(), img.height()), (180 * 7 + 7, 10));
    }

    #[test]
    fn stratified_output_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let records: Vec<_> = (1..80)
            .map(|n| {
                let d = if n % 3 == 0 { Direction::Rev } else { Direction::Fwd };
                rec(&"CAG".repeat(n), d)
            })
            .collect();
        let config = WaterfallConfig {
            sample_size: 50,
            ..WaterfallConfig::default()
        };

        let a = render_stratified(&records, &config, b"CAG", dir.path().join("a")).unwrap();
        let b = render_stratified(&records, &config, b"CAG", dir.path().join("b")).unwrap();
        assert_eq!(a.len(), 2);
        for (a, b) in a.iter().zip(&b) {
            assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
        }
    }

    #[test]
    fn annotated_rows_are_centred() {
        let a = Annotator::default();
        let row = |s: &str| {
            AnnotatedRow::new(s.as_bytes().to_vec(), a.annotate(s.as_bytes(), None, None))
        };
        let canvas = draw_annotated(&[row("CTGCTGCAG"), row("CAG")]).unwrap();

        assert_eq!((canvas.width(), canvas.height()), (9, 2));
        assert_eq!(canvas.pixel(0, 0), Some(color(DOUBLE_MOTIF)));
        assert_eq!(canvas.pixel(8, 0), Some(color(SINGLE_REV_MOTIF)));
        assert_eq!(canvas.pixel(2, 1), Some(GREY));
        assert_eq!(canvas.pixel(3, 1), Some(color(SINGLE_REV_MOTIF)));
        assert_eq!(canvas.pixel(6, 1), Some(GREY));
    }

    #[test]
    fn raw_waterfall_filters_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waterfall.png");
        let config = RawWaterfallConfig {
            sample_size: 20,
            max_len: 6,
            seed: 7,
        };
        let read = |seq: &str| FlankedRead {
            id: "r".to_owned(),
            seq: seq.as_bytes().to_vec(),
            prefix_flank: None,
            suffix_flank: None,
        };

        let too_long = vec![read("CAGCAGCAG")];
        assert!(!render_raw(&too_long, &Annotator::default(), &config, &path).unwrap());
        assert!(!path.exists());

        let reads = vec![read("CAGCAGCAG"), read("CTGCAG"), read("CAGCAG")];
        assert!(render_raw(&reads, &Annotator::default(), &config, &path).unwrap());

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (6, 20));
    }
}

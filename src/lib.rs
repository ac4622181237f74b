//! Waterfall images and summary tables for trinucleotide repeat genotyping.
//!
//! # Overview
//! Long reads spanning a repeat expansion (such as the CTG repeat of DM1) are
//! easiest to judge by eye when every read becomes one row of colored pixels.
//! This crate turns sequencing output into such images and into per-sample
//! count tables.
//!
//! The pipeline has three stages, each behind its own binary:
//! * `fastq2tsv` collects every merged FASTQ(.gz) file of a run into one
//!   headerless `seq\tid` table, see [`fastq`].
//! * `plots` joins that table with the on-target reads, renders the raw
//!   waterfall and the two length-stratified waterfalls of processed inserts,
//!   see [`waterfall`].
//! * `summarize` counts wild type and expanded alleles per direction and
//!   reports repeat length percentiles, see [`summary`].
//!
//! ## Annotation
//! Raw reads are rewritten token by token, keeping their length:
//! ```text
//! flanks:  GGTA               TTA
//! read:    GGTACTGCTGCTGCAGCAGTTA
//! tokens:  0000666666555333333000
//! ```
//! `6`/`5` mark the motif in doubled and single copies, `3`/`4` its reverse
//! complement, `0` the flanks and `_` any other base. See [`annotate`].
//!
//! ## Ordering
//! Rows are stacked so that similar reads sit together: processed inserts as
//! a forward block, a separator row and a reverse block; raw reads by the sign
//! of their directionality score. See [`order`].
//!
//! ## Configuration
//! Motif, thresholds, sample sizes, seeds and scales all have defaults and can
//! be overridden from a YAML file, see [`config`].

pub mod annotate;
pub mod canvas;
pub mod config;
pub mod errors;
pub mod fastq;
pub mod order;
pub mod palette;
pub mod params;
pub mod pipeline;
mod read;
pub mod sample;
pub mod summary;
pub mod table;
pub mod waterfall;

// commonly used functions and types

pub use crate::annotate::Annotator;
pub use crate::config::Config;
pub use crate::errors::{Error, Result};
pub use crate::read::*;
pub use crate::table::Table;

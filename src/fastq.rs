use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::{write::GzEncoder, Compression};
use log::{debug, info};
use needletail::parse_fastx_file;

use crate::errors::*;

/// Substring that marks a file in the input directory as a merged FASTQ.
pub const MERGED_FASTQ: &str = "merged.fastq";

/// A FASTQ record reduced to what the pipeline keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRead {
    /// `@` followed by the first space-delimited word of the header.
    pub id: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub fastqs: usize,
    pub reads: usize,
}

/// Sorted paths of regular files in `dir` whose name contains [`MERGED_FASTQ`].
pub fn find_fastqs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| Error::file_io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::file_io(dir, e))?.path();
        let is_merged = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.contains(MERGED_FASTQ));

        if is_merged && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

/// Read every record of a plain or gzipped FASTQ file.
pub fn read_fastq(file: impl AsRef<Path>) -> Result<Vec<FastqRead>> {
    let file = file.as_ref();
    let origin = file.display().to_string();
    let mut reader = parse_fastx_file(file).map_err(|e| Error::file_io(file, e))?;

    let mut reads = Vec::new();
    let mut idx = 0;
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| Error::ParseRecord {
            origin: origin.clone(),
            idx,
            source: Box::new(e),
        })?;

        let qual = record.qual().ok_or_else(|| Error::ParseRecord {
            origin: origin.clone(),
            idx,
            source: "record has no quality line".into(),
        })?;

        let name = record.id().split(|&c| c == b' ').next().unwrap_or_default();

        reads.push(FastqRead {
            id: format!("@{}", utf8(name)),
            seq: record.seq().into_owned(),
            qual: qual.to_owned(),
        });
        idx += 1;
    }

    debug!("Read {} records from {}", reads.len(), origin);
    Ok(reads)
}

/// Buffered writer for `file`, gzip compressed when the name ends in `.gz`.
pub fn create_writer(file: impl AsRef<Path>) -> Result<Box<dyn Write>> {
    let file = file.as_ref();

    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::file_io(file, e))?;
    }

    let f = File::create(file).map_err(|e| Error::file_io(file, e))?;
    let writer: Box<dyn Write> = if file.extension().map_or(false, |e| e == "gz") {
        Box::new(BufWriter::new(GzEncoder::new(f, Compression::default())))
    } else {
        Box::new(BufWriter::new(f))
    };

    Ok(writer)
}

pub fn write_tsv_record(writer: &mut dyn Write, read: &FastqRead) -> std::io::Result<()> {
    writer.write_all(&read.seq)?;
    writer.write_all(b"\t")?;
    writer.write_all(read.id.as_bytes())?;
    writer.write_all(b"\n")
}

/// Convert every merged FASTQ in `input_dir` into one headerless `seq\tid` table.
pub fn fastqs_to_tsv(
    input_dir: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<ConversionSummary> {
    let output = output.as_ref();
    let fastqs = find_fastqs(input_dir)?;
    let mut writer = create_writer(output)?;

    let mut summary = ConversionSummary {
        fastqs: fastqs.len(),
        reads: 0,
    };

    for fastq in &fastqs {
        let reads = read_fastq(fastq)?;
        for read in &reads {
            write_tsv_record(&mut *writer, read).map_err(|e| Error::file_io(output, e))?;
        }
        summary.reads += reads.len();
    }

    writer.flush().map_err(|e| Error::file_io(output, e))?;

    info!(
        "Wrote {} reads from {} FASTQ files to {}",
        summary.reads,
        summary.fastqs,
        output.display()
    );
    Ok(summary)
}

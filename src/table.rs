//! Tab separated tables and the typed records pulled out of them.

use std::path::Path;

use log::debug;
use rustc_hash::FxHashMap;

use crate::errors::*;
use crate::read::*;

/// Cell values that count as missing, following the usual dataframe
/// conventions for TSV files.
const MISSING: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "None"];

pub fn is_missing(cell: &str) -> bool {
    MISSING.contains(&cell)
}

/// A headered table of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(|h| h.into()).collect(),
            rows: Vec::new(),
        }
    }

    /// Read a TSV file. When `columns` is given the file has no header line and
    /// the columns are named in order.
    pub fn from_tsv(file: impl AsRef<Path>, columns: Option<&[&str]>) -> Result<Self> {
        let file = file.as_ref();
        let origin = file.display().to_string();

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(columns.is_none())
            .from_path(file)
            .map_err(|e| Error::file_io(file, e))?;

        let headers: Vec<String> = match columns {
            Some(cols) => cols.iter().map(|&c| c.to_owned()).collect(),
            None => reader
                .headers()
                .map_err(|e| Error::file_io(file, e))?
                .iter()
                .map(|h| h.to_owned())
                .collect(),
        };
        let mut table = Self::new(headers);

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::ParseRecord {
                origin: origin.clone(),
                idx,
                source: Box::new(e),
            })?;
            table.push(record.iter().map(|c| c.to_owned()).collect(), &origin)?;
        }

        debug!("Loaded {} rows from {}", table.len(), origin);
        Ok(table)
    }

    /// Headerless `seq\tid` table written by the FASTQ conversion.
    pub fn from_fastq_tsv(file: impl AsRef<Path>) -> Result<Self> {
        Self::from_tsv(file, Some(&["seq", "id"][..]))
    }

    pub fn write_tsv(&self, file: impl AsRef<Path>) -> Result<()> {
        let file = file.as_ref();

        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::file_io(file, e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(file)
            .map_err(|e| Error::file_io(file, e))?;

        writer
            .write_record(&self.headers)
            .map_err(|e| Error::file_io(file, e))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| Error::file_io(file, e))?;
        }
        writer.flush().map_err(|e| Error::file_io(file, e))?;

        Ok(())
    }

    pub fn push(&mut self, row: Vec<String>, context: &str) -> Result<()> {
        if row.len() != self.headers.len() {
            return Err(Error::malformed(
                context,
                format!(
                    "row {} has {} cells but there are {} columns",
                    self.rows.len(),
                    row.len(),
                    self.headers.len()
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::malformed("table", format!("missing column \"{name}\"")))
    }

    /// Full outer join on `key`.
    ///
    /// Rows come out sorted by key. Rows sharing a key keep their input order,
    /// `self` before `other`. Clashing column names get `_x` and `_y`
    /// suffixes and missing cells are left empty.
    pub fn outer_join(&self, other: &Table, key: &str) -> Result<Table> {
        let left_key = self.column(key)?;
        let right_key = other.column(key)?;

        let name = |h: &String, other: &Table| {
            if h != key && other.has_column(h) {
                None
            } else {
                Some(h.clone())
            }
        };

        let mut headers = Vec::with_capacity(self.headers.len() + other.headers.len() - 1);
        for h in &self.headers {
            headers.push(name(h, other).unwrap_or_else(|| format!("{h}_x")));
        }
        for (i, h) in other.headers.iter().enumerate() {
            if i != right_key {
                headers.push(name(h, self).unwrap_or_else(|| format!("{h}_y")));
            }
        }

        let mut by_key: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
        for (i, row) in other.rows.iter().enumerate() {
            by_key.entry(row[right_key].as_str()).or_default().push(i);
        }

        let right_cells = |row: &[String]| {
            row.iter()
                .enumerate()
                .filter(|&(i, _)| i != right_key)
                .map(|(_, c)| c.clone())
                .collect::<Vec<_>>()
        };

        let mut joined = Table::new(headers);
        let mut matched = vec![false; other.rows.len()];

        for row in &self.rows {
            match by_key.get(row[left_key].as_str()) {
                Some(matches) => {
                    for &i in matches {
                        matched[i] = true;
                        let mut cells = row.clone();
                        cells.extend(right_cells(&other.rows[i]));
                        joined.rows.push(cells);
                    }
                }
                None => {
                    let mut cells = row.clone();
                    cells.resize(joined.headers.len(), String::new());
                    joined.rows.push(cells);
                }
            }
        }

        for (i, row) in other.rows.iter().enumerate() {
            if matched[i] {
                continue;
            }
            let mut cells = vec![String::new(); self.headers.len()];
            cells[left_key] = row[right_key].clone();
            cells.extend(right_cells(row));
            joined.rows.push(cells);
        }

        joined.rows.sort_by(|a, b| a[left_key].cmp(&b[left_key]));
        Ok(joined)
    }
}

fn parse_len(cell: &str, column: &str, row: usize) -> Result<usize> {
    let bad = || {
        Error::malformed(
            "table",
            format!("row {row}: \"{cell}\" in column \"{column}\" is not a length"),
        )
    };

    // lengths written through a float column come back as e.g. "42.0"
    let value: f64 = cell.trim().parse().map_err(|_| bad())?;
    if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
        return Err(bad());
    }
    Ok(value as usize)
}

/// Processed insert records. `len` is taken from the `len_<seq_field>` column.
pub fn processed_records(table: &Table, seq_field: &str) -> Result<Vec<ReadRecord>> {
    let len_field = format!("len_{seq_field}");
    let id = table.column("id")?;
    let direction = table.column("direction")?;
    let seq = table.column(seq_field)?;
    let len = table.column(&len_field)?;

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let dir = row[direction]
                .parse::<Direction>()
                .map_err(|e| Error::malformed("table", format!("row {i}: {e}")))?;
            let cell = &row[seq];
            let seq = if is_missing(cell) {
                Vec::new()
            } else {
                cell.as_bytes().to_vec()
            };

            let len = parse_len(&row[len], &len_field, i)?;
            Ok(ReadRecord::new(row[id].clone(), seq, dir).with_len(len))
        })
        .collect()
}

/// Direction and length of every row, with an empty sequence. Only
/// `direction` and `len_field` are required; `id` is kept when present.
pub fn length_records(table: &Table, len_field: &str) -> Result<Vec<ReadRecord>> {
    let id = table.column("id").ok();
    let direction = table.column("direction")?;
    let len = table.column(len_field)?;

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let dir = row[direction]
                .parse::<Direction>()
                .map_err(|e| Error::malformed("table", format!("row {i}: {e}")))?;
            let id = id.map(|c| row[c].clone()).unwrap_or_default();
            let len = parse_len(&row[len], len_field, i)?;
            Ok(ReadRecord::new(id, Vec::<u8>::new(), dir).with_len(len))
        })
        .collect()
}

/// Reads with a sequence, together with their flanks when the table has them.
pub fn flanked_reads(table: &Table) -> Result<Vec<FlankedRead>> {
    let id = table.column("id")?;
    let seq = table.column("seq")?;
    let prefix = table.column("prefix_flank").ok();
    let suffix = table.column("suffix_flank").ok();

    let cell = |row: &[String], col: Option<usize>| {
        col.map(|c| &row[c])
            .filter(|c| !is_missing(c))
            .map(|c| c.as_bytes().to_vec())
    };

    Ok(table
        .rows()
        .iter()
        .filter(|row| !is_missing(&row[seq]))
        .map(|row| FlankedRead {
            id: row[id].clone(),
            seq: row[seq].as_bytes().to_vec(),
            prefix_flank: cell(row, prefix),
            suffix_flank: cell(row, suffix),
        })
        .collect())
}

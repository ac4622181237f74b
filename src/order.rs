//! Top-to-bottom row ordering for waterfall images.

use crate::annotate::directionality;
use crate::read::*;

/// Filler used for the row that separates forward from reverse reads.
pub const SEPARATOR: u8 = b'I';

/// An annotated read ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedRow {
    pub seq: Vec<u8>,
    pub tokens: Vec<u8>,
    pub score: i64,
}

impl AnnotatedRow {
    pub fn new(seq: Vec<u8>, tokens: Vec<u8>) -> Self {
        let score = directionality(&tokens);
        Self { seq, tokens, score }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Forward reads by ascending `(len, seq)`, then a separator row of `width`
/// [`SEPARATOR`]s, then reverse reads by descending `(len, seq)`.
///
/// The separator is only emitted when both blocks are non-empty.
pub fn split_block(records: &[ReadRecord], width: usize) -> Vec<Vec<u8>> {
    let (mut fwd, mut rev): (Vec<&ReadRecord>, Vec<&ReadRecord>) = records
        .iter()
        .partition(|r| r.direction == Direction::Fwd);

    fwd.sort_by(|a, b| (a.len, &a.seq).cmp(&(b.len, &b.seq)));
    rev.sort_by(|a, b| (b.len, &b.seq).cmp(&(a.len, &a.seq)));

    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.extend(fwd.iter().map(|r| r.seq.clone()));
    if !fwd.is_empty() && !rev.is_empty() {
        rows.push(vec![SEPARATOR; width]);
    }
    rows.extend(rev.iter().map(|r| r.seq.clone()));
    rows
}

/// Rows leaning towards the reverse complement motif (positive score) by
/// ascending `(len, seq)`, followed by everything else by descending
/// `(len, seq)`. Lengths and ties use the raw sequence, not the tokens.
pub fn score_split(rows: Vec<AnnotatedRow>) -> Vec<AnnotatedRow> {
    let (mut leaning, mut rest): (Vec<_>, Vec<_>) = rows.into_iter().partition(|r| r.score > 0);

    leaning.sort_by(|a, b| (a.len(), &a.seq).cmp(&(b.len(), &b.seq)));
    rest.sort_by(|a, b| (b.len(), &b.seq).cmp(&(a.len(), &a.seq)));

    leaning.extend(rest);
    leaning
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::Annotator;

    fn rec(seq: &str, direction: Direction) -> ReadRecord {
        ReadRecord::new("r", seq.as_bytes().to_vec(), direction)
    }

    fn bytes(v: &[&str]) -> Vec<Vec<u8>> {
        v.iter().map(|s| s.as_bytes().to_vec()).collect()
    }

    fn sorted(mut v: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
        v.sort();
        v
    }

    #[test]
    fn split_block_orders_each_direction() {
        let records = vec![
            rec("CAGCAG", Direction::Fwd),
            rec("CAG", Direction::Fwd),
            rec("AAG", Direction::Fwd),
            rec("TTT", Direction::Rev),
            rec("CTGCTG", Direction::Rev),
            rec("GGG", Direction::Rev),
        ];

        let rows = split_block(&records, 4);
        assert_eq!(
            rows,
            bytes(&["AAG", "CAG", "CAGCAG", "IIII", "CTGCTG", "TTT", "GGG"])
        );
    }

    #[test]
    fn split_block_without_reverse_has_no_separator() {
        let records = vec![rec("CAG", Direction::Fwd), rec("CA", Direction::Fwd)];
        let rows = split_block(&records, 3);
        assert_eq!(rows, vec![b"CA".to_vec(), b"CAG".to_vec()]);
    }

    #[test]
    fn split_block_keeps_every_sequence() {
        let records = vec![
            rec("CAG", Direction::Fwd),
            rec("CAG", Direction::Fwd),
            rec("CTG", Direction::Rev),
            rec("A", Direction::Rev),
        ];
        let rows = split_block(&records, 3);
        assert_eq!(rows.len(), records.len() + 1);

        let without_sep: Vec<_> = rows.into_iter().filter(|r| r != b"III").collect();
        assert_eq!(
            sorted(without_sep),
            sorted(records.iter().map(|r| r.seq.clone()).collect())
        );
    }

    #[test]
    fn score_split_orders_by_lean() {
        let a = Annotator::default();
        let row = |s: &str| {
            AnnotatedRow::new(s.as_bytes().to_vec(), a.annotate(s.as_bytes(), None, None))
        };

        let ordered = score_split(vec![
            row("CTGCTG"),
            row("CAGCAGCAG"),
            row("AAAA"),
            row("CAG"),
            row("CTGCTGCTG"),
            row("CTTCTG"),
        ]);

        let seqs: Vec<_> = ordered.into_iter().map(|r| r.seq).collect();
        assert_eq!(
            seqs,
            bytes(&["CAG", "CAGCAGCAG", "CTGCTGCTG", "CTTCTG", "CTGCTG", "AAAA"])
        );
    }

    #[test]
    fn equal_lengths_break_ties_on_sequence() {
        let records = vec![
            rec("GAC", Direction::Fwd),
            rec("CAG", Direction::Fwd),
            rec("AAA", Direction::Rev),
            rec("TAA", Direction::Rev),
        ];
        let rows = split_block(&records, 3);
        assert_eq!(rows[0], b"CAG");
        assert_eq!(rows[1], b"GAC");
        assert_eq!(rows[3], b"TAA");
        assert_eq!(rows[4], b"AAA");
    }
}

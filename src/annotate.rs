//! Per-base classification of repeat reads.
//!
//! A read is rewritten into a token string of the same length where every base
//! is replaced by a marker describing what it belongs to:
//!
//! | marker | meaning                                       |
//! |--------|-----------------------------------------------|
//! | `6`    | two adjacent copies of the motif              |
//! | `5`    | a single copy of the motif                    |
//! | `3`    | two adjacent copies of the reverse complement |
//! | `4`    | a single copy of the reverse complement       |
//! | `0`    | prefix or suffix flank                        |
//! | `_`    | any other base                                |
//!
//! For the default motif `CTG`, `CTGCTGCAG` becomes `666666444`.

use lazy_static::lazy_static;
use memchr::memmem;

use crate::errors::*;

pub const DOUBLE_MOTIF: u8 = b'6';
pub const SINGLE_MOTIF: u8 = b'5';
pub const DOUBLE_REV_MOTIF: u8 = b'3';
pub const SINGLE_REV_MOTIF: u8 = b'4';
pub const FLANK: u8 = b'0';
pub const OTHER: u8 = b'_';

pub const DEFAULT_MOTIF: &[u8] = b"CTG";

lazy_static! {
    static ref COMPLEMENT: [u8; 256] = {
        let mut table = [0u8; 256];
        for (i, c) in table.iter_mut().enumerate() {
            *c = i as u8;
        }
        for (a, b) in [(b'A', b'T'), (b'C', b'G'), (b'G', b'C'), (b'T', b'A')] {
            table[a as usize] = b;
        }
        table
    };
}

/// Reverse complement, leaving anything that is not `ACGT` untouched.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&c| COMPLEMENT[c as usize]).collect()
}

/// Class of a single annotated token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Part of a motif run in the forward orientation.
    Motif,
    /// Part of a motif run in the reverse complement orientation.
    RevMotif,
    Flank,
    Other,
}

impl Token {
    pub fn classify(c: u8) -> Self {
        match c {
            DOUBLE_MOTIF | SINGLE_MOTIF => Self::Motif,
            DOUBLE_REV_MOTIF | SINGLE_REV_MOTIF => Self::RevMotif,
            FLANK => Self::Flank,
            _ => Self::Other,
        }
    }
}

/// A literal substitution: every non-overlapping occurrence of `pattern` (or
/// only the leftmost one) is overwritten with `marker` repeated to the same
/// length.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: Vec<u8>,
    marker: u8,
    first_only: bool,
}

impl Rule {
    pub fn all(pattern: impl Into<Vec<u8>>, marker: u8) -> Self {
        Self {
            pattern: pattern.into(),
            marker,
            first_only: false,
        }
    }

    pub fn first(pattern: impl Into<Vec<u8>>, marker: u8) -> Self {
        Self {
            pattern: pattern.into(),
            marker,
            first_only: true,
        }
    }

    pub fn apply(&self, seq: &[u8]) -> Vec<u8> {
        let mut res = seq.to_owned();

        if self.pattern.is_empty() {
            return res;
        }

        for start in memmem::find_iter(seq, &self.pattern) {
            res[start..start + self.pattern.len()].fill(self.marker);
            if self.first_only {
                break;
            }
        }

        res
    }
}

/// Ordered rule set for one repeat motif.
#[derive(Debug, Clone)]
pub struct Annotator {
    motif: Vec<u8>,
    rev_motif: Vec<u8>,
    rules: Vec<Rule>,
}

impl Annotator {
    pub fn new(motif: impl AsRef<[u8]>) -> Result<Self> {
        let motif = motif.as_ref().to_ascii_uppercase();

        if motif.is_empty() || !motif.iter().all(|c| b"ACGT".contains(c)) {
            return Err(Error::malformed(
                "motif",
                format!("\"{}\" is not a non-empty ACGT string", utf8(&motif)),
            ));
        }

        let rev_motif = reverse_complement(&motif);
        if rev_motif == motif {
            return Err(Error::malformed(
                "motif",
                format!("\"{}\" is its own reverse complement", utf8(&motif)),
            ));
        }

        // doubles go first so a double run is never split into two singles
        let rules = vec![
            Rule::all(rev_motif.repeat(2), DOUBLE_REV_MOTIF),
            Rule::all(motif.repeat(2), DOUBLE_MOTIF),
            Rule::all(motif.clone(), SINGLE_MOTIF),
            Rule::all(rev_motif.clone(), SINGLE_REV_MOTIF),
            Rule::all(*b"A", OTHER),
            Rule::all(*b"T", OTHER),
            Rule::all(*b"C", OTHER),
            Rule::all(*b"G", OTHER),
        ];

        Ok(Self {
            motif,
            rev_motif,
            rules,
        })
    }

    pub fn motif(&self) -> &[u8] {
        &self.motif
    }

    /// Reverse complement of the motif, which is also the reference that
    /// waterfall cells are compared against.
    pub fn rev_motif(&self) -> &[u8] {
        &self.rev_motif
    }

    /// Annotate `seq`. Flanks are only masked when both are given.
    pub fn annotate(
        &self,
        seq: &[u8],
        prefix_flank: Option<&[u8]>,
        suffix_flank: Option<&[u8]>,
    ) -> Vec<u8> {
        let mut res = seq.to_owned();

        if let (Some(prefix), Some(suffix)) = (prefix_flank, suffix_flank) {
            res = Rule::first(prefix, FLANK).apply(&res);
            res = Rule::first(suffix, FLANK).apply(&res);
        }

        self.rules.iter().fold(res, |acc, rule| rule.apply(&acc))
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(DEFAULT_MOTIF).expect("default motif")
    }
}

/// Reverse complement motif tokens minus forward motif tokens, counting
/// single and double copies alike.
///
/// Positive scores lean towards the reverse complement orientation of the
/// motif (`CAG` for the default `CTG`).
pub fn directionality(tokens: &[u8]) -> i64 {
    tokens.iter().fold(0, |score, &c| match Token::classify(c) {
        Token::RevMotif => score + 1,
        Token::Motif => score - 1,
        _ => score,
    })
}

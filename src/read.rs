use std::fmt;
use std::str::FromStr;

use crate::errors::*;

/// Orientation of an on-target read relative to the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Fwd,
    Rev,
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fwd" => Ok(Self::Fwd),
            "rev" => Ok(Self::Rev),
            _ => Err(Error::malformed(
                "direction",
                format!("expected \"fwd\" or \"rev\", found \"{s}\""),
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fwd => write!(f, "fwd"),
            Self::Rev => write!(f, "rev"),
        }
    }
}

/// A single sequencing read with its alignment orientation.
///
/// `len` is carried separately from `seq` because processed tables report the
/// length of the extended insert alignment rather than of the raw read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    pub id: String,
    pub seq: Vec<u8>,
    pub direction: Direction,
    pub len: usize,
}

impl ReadRecord {
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>, direction: Direction) -> Self {
        let seq = seq.into();
        Self {
            id: id.into(),
            len: seq.len(),
            seq,
            direction,
        }
    }

    pub fn with_len(mut self, len: usize) -> Self {
        self.len = len;
        self
    }
}

/// A raw read joined with its on-target flanks, before annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlankedRead {
    pub id: String,
    pub seq: Vec<u8>,
    pub prefix_flank: Option<Vec<u8>>,
    pub suffix_flank: Option<Vec<u8>>,
}

impl FlankedRead {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_round_trip() {
        assert_eq!("fwd".parse::<Direction>().unwrap(), Direction::Fwd);
        assert_eq!("rev".parse::<Direction>().unwrap(), Direction::Rev);
        assert_eq!(Direction::Rev.to_string(), "rev");
    }

    #[test]
    fn unknown_direction_is_malformed() {
        let err = "both".parse::<Direction>().unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn record_len_defaults_to_sequence() {
        let r = ReadRecord::new("@r1", b"CAGCAG".to_vec(), Direction::Fwd);
        assert_eq!(r.len, 6);
        assert_eq!(r.with_len(2).len, 2);
    }
}

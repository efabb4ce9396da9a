//! CIGAR operation sequences: parsing, serialisation and the categories used
//! when scoring shared bases.

pub mod expected;
pub mod matcher;

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use rust_htslib::bam::record::Cigar;

pub use expected::{synthesize, DEFAULT_MIN_MATCH_TOTAL};
pub use matcher::{AccuracyRule, MatchOutcome, MatchSummary, Matcher, SkipRule};

lazy_static! {
    static ref CIGAR_TOKEN: Regex = Regex::new(r"(\d+)([MIDNSHP=X])").unwrap();
}

///////////////////////////////
/// One CIGAR operation letter
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
    Match,
    Insertion,
    Deletion,
    Splice,
    SoftClip,
    HardClip,
    Padding,
    SequenceMatch,
    Mismatch,
}

impl OpKind {
    pub fn from_letter(letter: u8) -> Option<OpKind> {
        match letter {
            b'M' => Some(OpKind::Match),
            b'I' => Some(OpKind::Insertion),
            b'D' => Some(OpKind::Deletion),
            b'N' => Some(OpKind::Splice),
            b'S' => Some(OpKind::SoftClip),
            b'H' => Some(OpKind::HardClip),
            b'P' => Some(OpKind::Padding),
            b'=' => Some(OpKind::SequenceMatch),
            b'X' => Some(OpKind::Mismatch),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            OpKind::Match => 'M',
            OpKind::Insertion => 'I',
            OpKind::Deletion => 'D',
            OpKind::Splice => 'N',
            OpKind::SoftClip => 'S',
            OpKind::HardClip => 'H',
            OpKind::Padding => 'P',
            OpKind::SequenceMatch => '=',
            OpKind::Mismatch => 'X',
        }
    }

    pub fn category(self) -> Category {
        match self {
            OpKind::Match | OpKind::SequenceMatch => Category::Match,
            OpKind::Insertion => Category::Insertion,
            OpKind::Deletion => Category::Deletion,
            OpKind::Splice => Category::Splice,
            OpKind::SoftClip => Category::SoftClip,
            OpKind::HardClip => Category::HardClip,
            OpKind::Padding => Category::Padding,
            OpKind::Mismatch => Category::Mismatch,
        }
    }

    /// Kinds whose lengths count towards the bases of an alignment: M, I, D, N.
    /// `=` and `X` are not counted
    pub fn counts_as_aligned_base(self) -> bool {
        matches!(
            self,
            OpKind::Match | OpKind::Insertion | OpKind::Deletion | OpKind::Splice
        )
    }
}

///////////////////////////////
/// Semantic category of an operation. Several letters may share one category
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Match,
    Insertion,
    Deletion,
    Splice,
    SoftClip,
    HardClip,
    Padding,
    Mismatch,
    Unknown,
}

impl Category {
    /// Total over all bytes; anything outside `MIDNSHP=X` is `Unknown`
    pub fn of_letter(letter: u8) -> Category {
        OpKind::from_letter(letter)
            .map(OpKind::category)
            .unwrap_or(Category::Unknown)
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Match => "match",
            Category::Insertion => "insertion",
            Category::Deletion => "deletion",
            Category::Splice => "splice",
            Category::SoftClip => "soft_clip",
            Category::HardClip => "hard_clip",
            Category::Padding => "padding",
            Category::Mismatch => "mismatch",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Op {
    pub len: u32,
    pub kind: OpKind,
}

impl Op {
    pub fn new(len: u32, kind: OpKind) -> Op {
        Op { len, kind }
    }
}

impl From<&Cigar> for Op {
    fn from(cigar: &Cigar) -> Op {
        match *cigar {
            Cigar::Match(len) => Op::new(len, OpKind::Match),
            Cigar::Ins(len) => Op::new(len, OpKind::Insertion),
            Cigar::Del(len) => Op::new(len, OpKind::Deletion),
            Cigar::RefSkip(len) => Op::new(len, OpKind::Splice),
            Cigar::SoftClip(len) => Op::new(len, OpKind::SoftClip),
            Cigar::HardClip(len) => Op::new(len, OpKind::HardClip),
            Cigar::Pad(len) => Op::new(len, OpKind::Padding),
            Cigar::Equal(len) => Op::new(len, OpKind::SequenceMatch),
            Cigar::Diff(len) => Op::new(len, OpKind::Mismatch),
        }
    }
}

///////////////////////////////
/// An ordered list of operations, as written in a CIGAR string
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpSequence(pub Vec<Op>);

impl OpSequence {
    /// Scan `text` for `<length><letter>` tokens.
    ///
    /// Text that does not form a token is skipped without error, as are tokens
    /// of length zero or with a length that does not fit in a `u32`.
    pub fn parse(text: &str) -> OpSequence {
        let ops = CIGAR_TOKEN
            .captures_iter(text)
            .filter_map(|caps| {
                let len: u32 = caps[1].parse().ok()?;
                let kind = OpKind::from_letter(caps[2].as_bytes()[0])?;
                (len > 0).then(|| Op::new(len, kind))
            })
            .collect();
        OpSequence(ops)
    }

    /// Operations of a decoded alignment record, dropping any of length zero
    pub fn from_cigars<'a, I: IntoIterator<Item = &'a Cigar>>(cigars: I) -> OpSequence {
        OpSequence(
            cigars
                .into_iter()
                .map(Op::from)
                .filter(|op| op.len > 0)
                .collect(),
        )
    }

    pub fn ops(&self) -> &[Op] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, op: Op) {
        self.0.push(op);
    }

    /// Sum of lengths of operations of the given kind
    pub fn total_of(&self, kind: OpKind) -> u64 {
        self.0
            .iter()
            .filter(|op| op.kind == kind)
            .map(|op| op.len as u64)
            .sum()
    }

    /// Sum of lengths over M, I, D and N operations
    pub fn aligned_bases(&self) -> u64 {
        self.0
            .iter()
            .filter(|op| op.kind.counts_as_aligned_base())
            .map(|op| op.len as u64)
            .sum()
    }
}

impl From<Vec<Op>> for OpSequence {
    fn from(ops: Vec<Op>) -> Self {
        OpSequence(ops)
    }
}

impl fmt::Display for OpSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for op in &self.0 {
            write!(f, "{}{}", op.len, op.kind.letter())?;
        }
        Ok(())
    }
}

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use rustc_hash::FxHashMap;

use crate::cigar::OpSequence;

/// Marker separating a subread's long-read name from its generation suffix
pub const SUBREAD_MARKER: &str = "random_subread";

const SEPARATORS: [char; 2] = ['/', '='];

lazy_static! {
    static ref INTERVAL_SUFFIX: Regex = Regex::new(r"_start_(\d+)_end_(\d+)$").unwrap();
}

///////////////////////////////
/// Read identifier held as its separator-delimited components.
///
/// Long-read names use `/` between components (`movie/zmw/ccs`). Aligners that
/// cannot carry `/` in a read name see the subreads with `=` instead, so both
/// long-read and subread names are split on either character.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ReadKey(Vec<String>);

impl ReadKey {
    pub fn from_long_read_name(name: &str) -> ReadKey {
        ReadKey(name.split(SEPARATORS).map(str::to_string).collect())
    }

    /// Key of the long read a subread was sampled from: everything before the
    /// generation marker, with trailing underscores removed
    pub fn from_subread_name(name: &str) -> ReadKey {
        let base = name.split(SUBREAD_MARKER).next().unwrap_or(name);
        let base = base.trim_end_matches('_');
        ReadKey(base.split(SEPARATORS).map(str::to_string).collect())
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// The form used as the prefix of generated subread names
    pub fn subread_prefix(&self) -> String {
        self.0.join("=")
    }
}

impl fmt::Display for ReadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Reference interval encoded at the end of a subread name, `(0, 0)` if absent
pub fn parse_interval(name: &str) -> (u64, u64) {
    INTERVAL_SUFFIX
        .captures(name)
        .and_then(|caps| Some((caps[1].parse().ok()?, caps[2].parse().ok()?)))
        .unwrap_or((0, 0))
}

#[derive(Clone, Debug)]
pub struct LongReadRecord {
    pub key: ReadKey,
    pub name: String,
    pub cigar: String,
    pub ops: OpSequence,
    pub sequence: Vec<u8>,
}

impl LongReadRecord {
    /// None if the alignment carries no CIGAR
    pub fn new(name: &str, cigar: &str, sequence: Vec<u8>) -> Option<LongReadRecord> {
        if cigar.is_empty() || cigar == "*" {
            return None;
        }
        Some(LongReadRecord {
            key: ReadKey::from_long_read_name(name),
            name: name.to_string(),
            cigar: cigar.to_string(),
            ops: OpSequence::parse(cigar),
            sequence,
        })
    }
}

#[derive(Clone, Debug)]
pub struct SubreadRecord {
    pub key: ReadKey,
    pub name: String,
    pub cigar: String,
    pub ops: OpSequence,
    pub start: u64,
    pub stop: u64,
}

impl SubreadRecord {
    /// None if the alignment carries no CIGAR
    pub fn new(name: &str, cigar: &str) -> Option<SubreadRecord> {
        if cigar.is_empty() || cigar == "*" {
            return None;
        }
        let (start, stop) = parse_interval(name);
        Some(SubreadRecord {
            key: ReadKey::from_subread_name(name),
            name: name.to_string(),
            cigar: cigar.to_string(),
            ops: OpSequence::parse(cigar),
            start,
            stop,
        })
    }
}

///////////////////////////////
/// Long reads by key. Built once, read-only while comparing
#[derive(Debug, Default)]
pub struct LongReadTable {
    reads: FxHashMap<ReadKey, LongReadRecord>,
}

impl LongReadTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records replace earlier ones with the same key
    pub fn insert(&mut self, record: LongReadRecord) {
        if let Some(old) = self.reads.insert(record.key.clone(), record) {
            log::debug!("Long read {} seen more than once, keeping the last alignment", old.name);
        }
    }

    pub fn get(&self, key: &ReadKey) -> Option<&LongReadRecord> {
        self.reads.get(key)
    }

    pub fn len(&self) -> usize {
        self.reads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reads.is_empty()
    }
}

impl FromIterator<LongReadRecord> for LongReadTable {
    fn from_iter<I: IntoIterator<Item = LongReadRecord>>(iter: I) -> Self {
        let mut table = LongReadTable::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

use super::{Category, OpSequence};

///////////////////////////////
/// What to do when the current expected and observed operations differ in kind
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SkipRule {
    /// Move on to the next observed operation; the expected cursor stays put
    #[default]
    Asymmetric,
    /// Consume whichever side has fewer bases left in its current operation
    /// (both on a tie), counting those bases as unaccounted
    Symmetric,
}

///////////////////////////////
/// Denominator used for accuracy
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AccuracyRule {
    /// Detected bases are the shared bases themselves. Accuracy is then
    /// always exactly 0.0 or 1.0
    #[default]
    SharedBases,
    /// Divide by the M/I/D/N bases of the expected CIGAR
    ExpectedBases,
}

///////////////////////////////
/// Shared bases per scored category, plus the observed bases left over
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub matches: u64,
    pub insertions: u64,
    pub deletions: u64,
    pub splices: u64,
    pub soft_clips: u64,
    pub unmatched_sub: i64,
}

impl MatchSummary {
    /// Add shared bases to a category. Returns false, and leaves the summary
    /// untouched, for categories that are not scored
    pub fn add_shared(&mut self, category: Category, n: u64) -> bool {
        let counter = match category {
            Category::Match => &mut self.matches,
            Category::Insertion => &mut self.insertions,
            Category::Deletion => &mut self.deletions,
            Category::Splice => &mut self.splices,
            Category::SoftClip => &mut self.soft_clips,
            _ => return false,
        };
        *counter += n;
        true
    }

    /// Shared bases over match, insertion, deletion and splice; soft clips excluded
    pub fn accurate_bases(&self) -> u64 {
        self.matches + self.insertions + self.deletions + self.splices
    }

    /// Shared bases over all five scored categories
    pub fn shared_bases(&self) -> u64 {
        self.accurate_bases() + self.soft_clips
    }

    /// Fold another summary into this one
    pub fn accumulate(&mut self, other: &MatchSummary) {
        self.matches += other.matches;
        self.insertions += other.insertions;
        self.deletions += other.deletions;
        self.splices += other.splices;
        self.soft_clips += other.soft_clips;
        self.unmatched_sub += other.unmatched_sub;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchOutcome {
    pub summary: MatchSummary,
    pub accuracy: f64,
    pub precision: f64,
}

impl MatchOutcome {
    pub fn is_full_match(&self) -> bool {
        self.accuracy == 1.0 && self.precision == 1.0
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Matcher {
    pub skip: SkipRule,
    pub accuracy: AccuracyRule,
}

impl Matcher {
    pub fn new(skip: SkipRule, accuracy: AccuracyRule) -> Matcher {
        Matcher { skip, accuracy }
    }

    /// Walk `expected` and `observed` with one cursor each, counting the bases
    /// where both show the same operation kind.
    pub fn compare(&self, expected: &OpSequence, observed: &OpSequence) -> MatchOutcome {
        let expected_ops = expected.ops();
        let observed_ops = observed.ops();
        let mut summary = MatchSummary::default();

        let mut e = 0;
        let mut o = 0;
        let mut remaining_e = expected_ops.first().map_or(0, |op| op.len);
        let mut remaining_o = observed_ops.first().map_or(0, |op| op.len);

        while e < expected_ops.len() && o < observed_ops.len() {
            let kind = expected_ops[e].kind;
            let (advance_e, advance_o) = if kind == observed_ops[o].kind {
                let shared = remaining_e.min(remaining_o);
                summary.add_shared(kind.category(), shared as u64);
                remaining_e -= shared;
                remaining_o -= shared;
                (remaining_e == 0, remaining_o == 0)
            } else {
                match self.skip {
                    SkipRule::Asymmetric => (false, true),
                    SkipRule::Symmetric => (remaining_e <= remaining_o, remaining_o <= remaining_e),
                }
            };

            if advance_e {
                e += 1;
                remaining_e = expected_ops.get(e).map_or(0, |op| op.len);
            }
            if advance_o {
                o += 1;
                remaining_o = observed_ops.get(o).map_or(0, |op| op.len);
            }
        }

        let total_observed = observed.aligned_bases() as i64;
        summary.unmatched_sub = total_observed - summary.shared_bases() as i64;

        let accurate = summary.accurate_bases() as f64;
        let detected = match self.accuracy {
            AccuracyRule::SharedBases => summary.accurate_bases() as f64,
            AccuracyRule::ExpectedBases => expected.aligned_bases() as f64,
        };
        let accuracy = if detected > 0.0 { accurate / detected } else { 0.0 };

        let denominator = accurate + summary.unmatched_sub as f64;
        let precision = if denominator > 0.0 {
            accurate / denominator
        } else {
            0.0
        };

        MatchOutcome {
            summary,
            accuracy,
            precision,
        }
    }
}

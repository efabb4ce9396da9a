use rayon::prelude::*;
use serde::Serialize;

use crate::cigar::{synthesize, MatchOutcome, MatchSummary, Matcher, DEFAULT_MIN_MATCH_TOTAL};

use super::records::{LongReadRecord, LongReadTable, SubreadRecord};

#[derive(Clone, Copy, Debug)]
pub struct CompareParams {
    pub min_match_total: u32,
    pub matcher: Matcher,
}

impl Default for CompareParams {
    fn default() -> Self {
        CompareParams {
            min_match_total: DEFAULT_MIN_MATCH_TOTAL,
            matcher: Matcher::default(),
        }
    }
}

///////////////////////////////
/// One line of the report, in column order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonRow {
    #[serde(rename = "Subread ID")]
    pub subread_id: String,
    #[serde(rename = "Subread CIGAR")]
    pub subread_cigar: String,
    #[serde(rename = "Expected CIGAR")]
    pub expected_cigar: String,
    #[serde(rename = "Start")]
    pub start: u64,
    #[serde(rename = "Stop")]
    pub stop: u64,
    #[serde(rename = "Long Read CIGAR")]
    pub long_read_cigar: String,
    #[serde(rename = "Shared Matches")]
    pub shared_matches: u64,
    #[serde(rename = "Shared Insertions")]
    pub shared_insertions: u64,
    #[serde(rename = "Shared Deletions")]
    pub shared_deletions: u64,
    #[serde(rename = "Shared Splices")]
    pub shared_splices: u64,
    #[serde(rename = "Soft Clips")]
    pub soft_clips: u64,
    #[serde(rename = "Unmatched Subread")]
    pub unmatched_subread: i64,
    #[serde(rename = "Accuracy")]
    pub accuracy: f64,
    #[serde(rename = "Precision")]
    pub precision: f64,
}

///////////////////////////////
/// Counters for a whole run
#[derive(Clone, Debug, Default)]
pub struct RunStats {
    pub total_subreads: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub fully_matched: usize,
    pub accuracy_sum: f64,
    pub precision_sum: f64,
    pub totals: MatchSummary,
}

impl RunStats {
    fn add(&mut self, outcome: &MatchOutcome) {
        self.matched += 1;
        if outcome.is_full_match() {
            self.fully_matched += 1;
        }
        self.accuracy_sum += outcome.accuracy;
        self.precision_sum += outcome.precision;
        self.totals.accumulate(&outcome.summary);
    }

    /// Mean over all subreads given, matched or not
    pub fn average_accuracy(&self) -> f64 {
        if self.total_subreads == 0 {
            0.0
        } else {
            self.accuracy_sum / self.total_subreads as f64
        }
    }

    /// Mean over all subreads given, matched or not
    pub fn average_precision(&self) -> f64 {
        if self.total_subreads == 0 {
            0.0
        } else {
            self.precision_sum / self.total_subreads as f64
        }
    }

    pub fn log_summary(&self) {
        log::info!(
            "Matched {}/{} subreads to long reads.",
            self.matched,
            self.total_subreads
        );
        log::info!(
            "Fully matched: {}/{} subreads.",
            self.fully_matched,
            self.total_subreads
        );
        log::info!("Average Accuracy: {:.4}", self.average_accuracy());
        log::info!("Average Precision: {:.4}", self.average_precision());
        log::info!(
            "Shared bases: match {}, insertion {}, deletion {}, splice {}, soft_clip {}; unmatched subread bases {}",
            self.totals.matches,
            self.totals.insertions,
            self.totals.deletions,
            self.totals.splices,
            self.totals.soft_clips,
            self.totals.unmatched_sub
        );
    }
}

#[derive(Debug, Default)]
pub struct ComparisonRun {
    pub rows: Vec<ComparisonRow>,
    pub stats: RunStats,
}

/// Compare one subread against its long read
pub fn compare_pair(
    long: &LongReadRecord,
    subread: &SubreadRecord,
    params: &CompareParams,
) -> (ComparisonRow, MatchOutcome) {
    let expected = synthesize(&long.ops, subread.start, subread.stop, params.min_match_total);
    let outcome = params.matcher.compare(&expected, &subread.ops);
    let summary = &outcome.summary;
    let row = ComparisonRow {
        subread_id: subread.name.clone(),
        subread_cigar: subread.cigar.clone(),
        expected_cigar: expected.to_string(),
        start: subread.start,
        stop: subread.stop,
        long_read_cigar: long.cigar.clone(),
        shared_matches: summary.matches,
        shared_insertions: summary.insertions,
        shared_deletions: summary.deletions,
        shared_splices: summary.splices,
        soft_clips: summary.soft_clips,
        unmatched_subread: summary.unmatched_sub,
        accuracy: outcome.accuracy,
        precision: outcome.precision,
    };
    (row, outcome)
}

/// Score every subread against the long read it was drawn from.
///
/// Subreads run in parallel on the current rayon pool; rows come back in input
/// order. Subreads without a long read are counted but produce no row.
pub fn compare_all(
    long_reads: &LongReadTable,
    subreads: &[SubreadRecord],
    params: &CompareParams,
) -> ComparisonRun {
    let results: Vec<Option<(ComparisonRow, MatchOutcome)>> = subreads
        .par_iter()
        .map(|subread| {
            let long = long_reads.get(&subread.key)?;
            Some(compare_pair(long, subread, params))
        })
        .collect();

    let mut run = ComparisonRun::default();
    run.stats.total_subreads = subreads.len();
    for (subread, result) in subreads.iter().zip(results) {
        match result {
            Some((row, outcome)) => {
                run.stats.add(&outcome);
                run.rows.push(row);
            }
            None => {
                log::debug!("No long read {} for subread {}", subread.key, subread.name);
                run.stats.unmatched += 1;
            }
        }
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(reads: &[(&str, &str)]) -> LongReadTable {
        reads
            .iter()
            .filter_map(|(name, cigar)| LongReadRecord::new(name, cigar, Vec::new()))
            .collect()
    }

    fn subread(name: &str, cigar: &str) -> SubreadRecord {
        SubreadRecord::new(name, cigar).unwrap()
    }

    #[test]
    fn single_full_match() {
        let long = table(&[("mv/1/ccs", "100M")]);
        let subs = vec![subread("mv=1=ccs_random_subread_1_start_20_end_70", "50M")];
        let run = compare_all(&long, &subs, &CompareParams::default());

        assert_eq!(run.rows.len(), 1);
        let row = &run.rows[0];
        assert_eq!(row.expected_cigar, "150M");
        assert_eq!(row.long_read_cigar, "100M");
        assert_eq!((row.start, row.stop), (20, 70));
        assert_eq!(row.shared_matches, 50);
        assert_eq!(row.unmatched_subread, 0);
        assert_eq!(row.accuracy, 1.0);
        assert_eq!(row.precision, 1.0);
        assert_eq!(run.stats.fully_matched, 1);
        assert_eq!(run.stats.average_accuracy(), 1.0);
    }

    #[test]
    fn unmatched_subreads_count_towards_averages() {
        let long = table(&[("mv/1/ccs", "100M")]);
        let subs = vec![
            subread("mv=1=ccs_random_subread_1_start_20_end_70", "30M20I"),
            subread("mv=2=ccs_random_subread_1_start_20_end_70", "50M"),
        ];
        let run = compare_all(&long, &subs, &CompareParams::default());

        assert_eq!(run.rows.len(), 1);
        assert_eq!(run.stats.total_subreads, 2);
        assert_eq!(run.stats.matched, 1);
        assert_eq!(run.stats.unmatched, 1);
        assert_eq!(run.stats.fully_matched, 0);
        assert_eq!(run.stats.average_accuracy(), 0.5);
        assert!((run.stats.average_precision() - 0.3).abs() < 1e-12);
        assert_eq!(run.stats.totals.matches, 30);
        assert_eq!(run.stats.totals.unmatched_sub, 20);
    }

    #[test]
    fn missing_interval_still_reported() {
        let long = table(&[("mv/1/ccs", "100M")]);
        let subs = vec![subread("mv=1=ccs_random_subread_1", "50M")];
        let run = compare_all(&long, &subs, &CompareParams::default());
        assert_eq!(run.rows.len(), 1);
        assert_eq!((run.rows[0].start, run.rows[0].stop), (0, 0));
        assert_eq!(run.rows[0].expected_cigar, "150M");
    }

    #[test]
    fn no_subreads() {
        let run = compare_all(&table(&[("a/1", "10M")]), &[], &CompareParams::default());
        assert!(run.rows.is_empty());
        assert_eq!(run.stats.average_accuracy(), 0.0);
        assert_eq!(run.stats.average_precision(), 0.0);
    }

    #[test]
    fn rows_keep_input_order() {
        let long = table(&[("a/1", "1000M"), ("b/1", "1000M")]);
        let subs: Vec<SubreadRecord> = (0..200)
            .map(|i| {
                let base = if i % 3 == 0 { "b=1" } else { "a=1" };
                subread(
                    &format!("{}_random_subread_{}_start_{}_end_{}", base, i, i, i + 150),
                    "150M",
                )
            })
            .collect();
        let run = compare_all(&long, &subs, &CompareParams::default());
        let names: Vec<&str> = run.rows.iter().map(|r| r.subread_id.as_str()).collect();
        let input: Vec<&str> = subs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, input);
        assert_eq!(run.stats.fully_matched, 200);
    }
}

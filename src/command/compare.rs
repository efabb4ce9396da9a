use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::bam::AlignmentReader;
use crate::cigar::{AccuracyRule, Matcher, SkipRule, DEFAULT_MIN_MATCH_TOTAL};
use crate::compare::{compare_all, write_report, CompareParams, RunStats};

use super::determine_thread_count;

#[derive(Args)]
pub struct CompareCMD {
    #[arg(short = 'l', long = "long-reads", value_parser)]
    /// SAM/BAM/CRAM with the long-read alignments
    pub path_long: PathBuf,

    #[arg(short = 's', long = "subreads", value_parser)]
    /// SAM/BAM/CRAM with the subread alignments
    pub path_subreads: PathBuf,

    #[arg(short = 'o', value_parser)]
    /// Full path of the TSV report to write
    pub path_out: PathBuf,

    #[arg(long = "min-match-total", value_parser, default_value_t = DEFAULT_MIN_MATCH_TOTAL)]
    /// Matched bases an expected CIGAR is padded up to; the subread length used when sampling
    pub min_match_total: u32,

    #[arg(long = "symmetric-skip", value_parser, default_value = "false")]
    /// On differing operations, consume the shorter side instead of only advancing the subread
    pub symmetric_skip: bool,

    #[arg(long = "expected-accuracy", value_parser, default_value = "false")]
    /// Compute accuracy against the expected CIGAR's bases rather than the shared bases
    pub expected_accuracy: bool,

    //Thread settings
    #[arg(short = '@', long = "threads", value_parser = clap::value_parser!(usize))]
    num_threads_total: Option<usize>,
}
impl CompareCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let num_threads = determine_thread_count(self.num_threads_total)?;
        log::info!("Using threads {}", num_threads);

        let skip = if self.symmetric_skip {
            SkipRule::Symmetric
        } else {
            SkipRule::Asymmetric
        };
        let accuracy = if self.expected_accuracy {
            AccuracyRule::ExpectedBases
        } else {
            AccuracyRule::SharedBases
        };

        let stats = Compare::run(&Compare {
            path_long: self.path_long.clone(),
            path_subreads: self.path_subreads.clone(),
            path_out: self.path_out.clone(),
            num_threads,
            params: CompareParams {
                min_match_total: self.min_match_total,
                matcher: Matcher::new(skip, accuracy),
            },
        })?;
        stats.log_summary();

        log::info!("Results saved to {}", self.path_out.display());
        Ok(())
    }
}

pub struct Compare {
    pub path_long: PathBuf,
    pub path_subreads: PathBuf,
    pub path_out: PathBuf,
    pub num_threads: usize,
    pub params: CompareParams,
}
impl Compare {
    /// Run the algorithm
    pub fn run(params: &Compare) -> Result<RunStats> {
        let long_reads = AlignmentReader::from_path(&params.path_long, params.num_threads)?
            .read_long_reads()?;
        let subreads = AlignmentReader::from_path(&params.path_subreads, params.num_threads)?
            .read_subreads()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.num_threads)
            .build()?;
        let run = pool.install(|| compare_all(&long_reads, &subreads, &params.params));

        write_report(&params.path_out, &run.rows)?;
        Ok(run.stats)
    }
}

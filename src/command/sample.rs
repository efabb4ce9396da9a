use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::simulate::{SampleStats, SubreadSampler};

use super::determine_thread_count;

pub const DEFAULT_SUBREAD_LENGTH: usize = 150;

#[derive(Args)]
pub struct SampleCMD {
    #[arg(short = 'i', value_parser)]
    /// SAM/BAM/CRAM with the long-read alignments
    pub path_in: PathBuf,

    #[arg(short = 'o', value_parser)]
    /// FASTA file to write the subreads to
    pub path_out: PathBuf,

    #[arg(long = "length", value_parser, default_value_t = DEFAULT_SUBREAD_LENGTH)]
    /// Length of each subread
    pub subread_length: usize,

    #[arg(long = "seed", value_parser)]
    /// Random seed; drawn at random if not given
    pub seed: Option<u64>,

    #[arg(long = "absolute", value_parser, default_value = "false")]
    /// Name subreads by genomic position instead of the offset along the long read's CIGAR
    pub absolute: bool,

    //Thread settings
    #[arg(short = '@', long = "threads", value_parser = clap::value_parser!(usize))]
    num_threads_total: Option<usize>,
}
impl SampleCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        let num_threads = determine_thread_count(self.num_threads_total)?;
        let seed = self.seed.unwrap_or_else(rand::random);
        log::info!("Sampling subreads of length {} with seed {}", self.subread_length, seed);

        let stats = Sample::run(&Sample {
            path_in: self.path_in.clone(),
            path_out: self.path_out.clone(),
            subread_length: self.subread_length,
            absolute: self.absolute,
            seed,
            num_threads,
        })?;

        log::info!(
            "Wrote {} subreads from {} long reads to {} ({} reads skipped, {} draws without reference position)",
            stats.subreads_written,
            stats.reads_seen,
            self.path_out.display(),
            stats.reads_skipped,
            stats.subreads_unplaced
        );
        Ok(())
    }
}

pub struct Sample {
    pub path_in: PathBuf,
    pub path_out: PathBuf,
    pub subread_length: usize,
    pub absolute: bool,
    pub seed: u64,
    pub num_threads: usize,
}
impl Sample {
    /// Run the algorithm
    pub fn run(params: &Sample) -> Result<SampleStats> {
        if params.subread_length == 0 {
            anyhow::bail!("Subread length must be at least 1");
        }
        let sampler = SubreadSampler {
            subread_length: params.subread_length,
            absolute_coordinates: params.absolute,
        };
        sampler.sample_file(&params.path_in, &params.path_out, params.num_threads, params.seed)
    }
}

use clap::Subcommand;

pub mod compare;
pub mod sample;
pub mod threadcount;

pub use compare::{Compare, CompareCMD};
pub use sample::{Sample, SampleCMD};
pub use threadcount::determine_thread_count;

///////////////////////////////
/// Possible subcommands to parse
#[derive(Subcommand)]
pub enum Commands {
    /// Score subread alignments against the long-read alignments they were drawn from
    Compare(CompareCMD),
    /// Draw random subreads from long-read alignments into a FASTA file
    Sample(SampleCMD),
}

impl std::fmt::Debug for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cmd = match self {
            Commands::Compare(_) => "Compare",
            Commands::Sample(_) => "Sample",
        };
        write!(f, "{}", cmd)
    }
}

pub mod subreads;

pub use subreads::{cigar_positions, reference_positions, subread_name, SampleStats, SampledSubread, SubreadSampler};

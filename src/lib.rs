pub mod bam;
pub mod cigar;
pub mod command;
pub mod compare;
pub mod runtime;
pub mod simulate;

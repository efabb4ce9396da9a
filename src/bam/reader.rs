use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_htslib::bam;
use rust_htslib::bam::Read;

use crate::compare::{LongReadRecord, LongReadTable, SubreadRecord};
use crate::runtime;

///////////////////////////////
/// Sequential reader over a SAM/BAM/CRAM file
pub struct AlignmentReader {
    reader: bam::Reader,
    path: PathBuf,
}

impl AlignmentReader {
    pub fn from_path<P: AsRef<Path>>(path: P, num_threads: usize) -> Result<Self> {
        let path = path.as_ref();
        runtime::ensure_input_exists(path)?;

        let mut reader = bam::Reader::from_path(path)
            .with_context(|| format!("Could not open alignment file {}", path.display()))?;

        //Activate multithreaded decompression
        if num_threads > 1 {
            reader.set_threads(num_threads)?;
        }

        Ok(AlignmentReader {
            reader,
            path: path.to_path_buf(),
        })
    }

    /// Call `f` on every record in file order
    pub fn for_each_record<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&bam::Record) -> Result<()>,
    {
        let mut record = bam::Record::new();
        while let Some(r) = self.reader.read(&mut record) {
            r.map_err(|e| runtime::Error::file_not_valid(&self.path, Some(e.to_string())))?;
            f(&record)?;
        }
        Ok(())
    }

    /// All long reads that carry a CIGAR, keyed for subread lookup
    pub fn read_long_reads(mut self) -> Result<LongReadTable> {
        log::info!("Processing long reads from {}", self.path.display());
        let mut table = LongReadTable::new();
        self.for_each_record(|record| {
            let name = read_name(record);
            let cigar = record.cigar().to_string();
            match LongReadRecord::new(&name, &cigar, record.seq().as_bytes()) {
                Some(long) => table.insert(long),
                None => log::warn!("Read {} has no CIGAR string", name),
            }
            Ok(())
        })?;
        log::info!("Long reads table: {} entries", table.len());
        Ok(table)
    }

    /// All subreads that carry a CIGAR, in file order
    pub fn read_subreads(mut self) -> Result<Vec<SubreadRecord>> {
        log::info!("Processing subreads from {}", self.path.display());
        let mut subreads = Vec::new();
        self.for_each_record(|record| {
            let name = read_name(record);
            let cigar = record.cigar().to_string();
            match SubreadRecord::new(&name, &cigar) {
                Some(sub) => subreads.push(sub),
                None => log::warn!("Subread {} has no CIGAR string", name),
            }
            Ok(())
        })?;
        log::info!("Subread list: {} entries", subreads.len());
        Ok(subreads)
    }
}

pub fn read_name(record: &bam::Record) -> String {
    String::from_utf8_lossy(record.qname()).into_owned()
}

use std::path::Path;

use anyhow::{Context, Result};
use bio::io::fasta;
use rand::{distributions::Uniform, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};

use crate::bam::{read_name, AlignmentReader};
use crate::cigar::{OpKind, OpSequence};
use crate::compare::{ReadKey, SUBREAD_MARKER};

/// Reference position of every query base of an alignment starting at `ref_start`.
/// Inserted and soft-clipped bases have no reference position.
pub fn reference_positions(ops: &OpSequence, ref_start: i64) -> Vec<Option<i64>> {
    let mut positions = Vec::new();
    let mut ref_pos = ref_start;
    for op in ops.ops() {
        let len = op.len as i64;
        match op.kind {
            OpKind::Match | OpKind::SequenceMatch | OpKind::Mismatch => {
                positions.extend((ref_pos..ref_pos + len).map(Some));
                ref_pos += len;
            }
            OpKind::Insertion | OpKind::SoftClip => {
                positions.extend(std::iter::repeat(None).take(op.len as usize));
            }
            OpKind::Deletion | OpKind::Splice => ref_pos += len,
            OpKind::HardClip | OpKind::Padding => {}
        }
    }
    positions
}

/// Position of every query base on a cursor that starts at 0 and advances by the
/// length of every operation, the frame in which expected CIGARs are projected.
/// Inserted and soft-clipped bases have no position.
pub fn cigar_positions(ops: &OpSequence) -> Vec<Option<i64>> {
    let mut positions = Vec::new();
    let mut cursor: i64 = 0;
    for op in ops.ops() {
        let len = op.len as i64;
        match op.kind {
            OpKind::Match | OpKind::SequenceMatch | OpKind::Mismatch => {
                positions.extend((cursor..cursor + len).map(Some));
            }
            OpKind::Insertion | OpKind::SoftClip => {
                positions.extend(std::iter::repeat(None).take(op.len as usize));
            }
            OpKind::Deletion | OpKind::Splice | OpKind::HardClip | OpKind::Padding => {}
        }
        cursor += len;
    }
    positions
}

/// Name a subread so that the comparison can recover its long read and interval
pub fn subread_name(key: &ReadKey, index: usize, ref_start: i64, ref_end: i64) -> String {
    format!(
        "{}_{}_{}_start_{}_end_{}",
        key.subread_prefix(),
        SUBREAD_MARKER,
        index,
        ref_start,
        ref_end
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampledSubread {
    pub name: String,
    pub sequence: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct SampleStats {
    pub reads_seen: usize,
    pub reads_skipped: usize,
    pub subreads_written: usize,
    pub subreads_unplaced: usize,
}

pub struct SubreadSampler {
    pub subread_length: usize,
    pub absolute_coordinates: bool,
}

impl SubreadSampler {
    /// Draw `len / subread_length` subreads at uniformly random offsets.
    ///
    /// Draws whose first or last base has no reference position are dropped,
    /// and returned as the second value.
    pub fn sample_read<R: Rng>(
        &self,
        key: &ReadKey,
        sequence: &[u8],
        positions: &[Option<i64>],
        rng: &mut R,
    ) -> (Vec<SampledSubread>, usize) {
        let n = sequence.len();
        if self.subread_length == 0 || n <= self.subread_length {
            return (Vec::new(), 0);
        }

        let offsets = Uniform::new_inclusive(0, n - self.subread_length);
        let num_subreads = n / self.subread_length;
        let mut subreads = Vec::with_capacity(num_subreads);
        let mut unplaced = 0;

        for i in 0..num_subreads {
            let start = offsets.sample(rng);
            let end = start + self.subread_length - 1;
            let placed = positions.get(start).copied().flatten().zip(positions.get(end).copied().flatten());
            match placed {
                Some((ref_start, ref_end)) => subreads.push(SampledSubread {
                    name: subread_name(key, i + 1, ref_start, ref_end),
                    sequence: sequence[start..=end].to_vec(),
                }),
                None => {
                    log::debug!("Subread {} of {} at offset {} has no reference position", i + 1, key, start);
                    unplaced += 1;
                }
            }
        }
        (subreads, unplaced)
    }

    /// Sample every primary long-read alignment of `path_in` into a FASTA file
    pub fn sample_file(
        &self,
        path_in: &Path,
        path_out: &Path,
        num_threads: usize,
        seed: u64,
    ) -> Result<SampleStats> {
        let mut reader = AlignmentReader::from_path(path_in, num_threads)?;

        let writer_file = std::fs::File::create(path_out)
            .with_context(|| format!("Could not create output file {}", path_out.display()))?;
        let mut writer = fasta::Writer::new(std::io::BufWriter::new(writer_file));

        let mut rng = StdRng::seed_from_u64(seed);
        let mut stats = SampleStats::default();

        reader.for_each_record(|record| {
            if record.is_secondary() || record.is_supplementary() || record.is_unmapped() {
                return Ok(());
            }
            stats.reads_seen += 1;

            let name = read_name(record);
            let ops = OpSequence::from_cigars(record.cigar().iter());
            let sequence = record.seq().as_bytes();
            let positions = if self.absolute_coordinates {
                reference_positions(&ops, record.pos())
            } else {
                cigar_positions(&ops)
            };
            if positions.len() != sequence.len() {
                log::warn!(
                    "Read {} has {} bases but its CIGAR covers {}, skipping",
                    name,
                    sequence.len(),
                    positions.len()
                );
                stats.reads_skipped += 1;
                return Ok(());
            }

            let key = ReadKey::from_long_read_name(&name);
            let (subreads, unplaced) = self.sample_read(&key, &sequence, &positions, &mut rng);
            for sub in &subreads {
                writer.write(&sub.name, None, &sub.sequence)?;
            }
            stats.subreads_written += subreads.len();
            stats.subreads_unplaced += unplaced;
            Ok(())
        })?;
        writer.flush()?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cigar::synthesize;
    use crate::compare::{parse_interval, SubreadRecord};

    #[test]
    fn positions_follow_cigar() {
        let ops = OpSequence::parse("2S3M1I2D2M3N1M");
        let positions = reference_positions(&ops, 100);
        assert_eq!(
            positions,
            vec![
                None,
                None,
                Some(100),
                Some(101),
                Some(102),
                None,
                Some(105),
                Some(106),
                Some(110),
            ]
        );
    }

    #[test]
    fn cigar_positions_count_every_operation() {
        let ops = OpSequence::parse("2S3M1I2D2M3N1H1M");
        assert_eq!(
            cigar_positions(&ops),
            vec![None, None, Some(2), Some(3), Some(4), None, Some(8), Some(9), Some(14)]
        );
    }

    #[test]
    fn relative_names_project_onto_matches_after_soft_clip() {
        let long = OpSequence::parse("5S100M");
        let positions = cigar_positions(&long);
        assert_eq!(positions[5], Some(5));

        let sampler = SubreadSampler {
            subread_length: 10,
            absolute_coordinates: false,
        };
        let key = ReadKey::from_long_read_name("r/1");
        let mut rng = StdRng::seed_from_u64(11);
        let (subreads, _) = sampler.sample_read(&key, &[b'T'; 105], &positions, &mut rng);
        assert!(!subreads.is_empty());
        for sub in &subreads {
            let (start, stop) = parse_interval(&sub.name);
            let expected = synthesize(&long, start, stop, 0);
            assert!(!expected.is_empty());
            assert!(expected.ops().iter().all(|op| op.kind == OpKind::Match), "{}", expected);
        }
    }

    #[test]
    fn hard_clips_take_no_bases() {
        let ops = OpSequence::parse("5H4M5H");
        assert_eq!(reference_positions(&ops, 0).len(), 4);
    }

    #[test]
    fn name_round_trips_through_comparison() {
        let key = ReadKey::from_long_read_name("movie/42/ccs");
        let name = subread_name(&key, 3, 1200, 1349);
        assert_eq!(name, "movie=42=ccs_random_subread_3_start_1200_end_1349");
        assert_eq!(parse_interval(&name), (1200, 1349));
        let sub = SubreadRecord::new(&name, "150M").unwrap();
        assert_eq!(sub.key, key);
    }

    #[test]
    fn sample_count_and_placement() {
        let sampler = SubreadSampler {
            subread_length: 150,
            absolute_coordinates: false,
        };
        let key = ReadKey::from_long_read_name("r/1");
        let sequence = vec![b'A'; 1000];
        let positions = reference_positions(&OpSequence::parse("1000M"), 0);
        let mut rng = StdRng::seed_from_u64(7);

        let (subreads, unplaced) = sampler.sample_read(&key, &sequence, &positions, &mut rng);
        assert_eq!(subreads.len(), 6);
        assert_eq!(unplaced, 0);
        for sub in &subreads {
            assert_eq!(sub.sequence.len(), 150);
            let (start, stop) = parse_interval(&sub.name);
            assert_eq!(stop - start, 149);
            assert!(stop < 1000);
        }
    }

    #[test]
    fn short_reads_yield_nothing() {
        let sampler = SubreadSampler {
            subread_length: 150,
            absolute_coordinates: false,
        };
        let key = ReadKey::from_long_read_name("r/1");
        let positions = reference_positions(&OpSequence::parse("150M"), 0);
        let mut rng = StdRng::seed_from_u64(7);
        let (subreads, _) = sampler.sample_read(&key, &[b'C'; 150], &positions, &mut rng);
        assert!(subreads.is_empty());
    }

    #[test]
    fn unplaced_draws_are_dropped() {
        let sampler = SubreadSampler {
            subread_length: 10,
            absolute_coordinates: false,
        };
        let key = ReadKey::from_long_read_name("r/1");
        let positions = reference_positions(&OpSequence::parse("40S"), 0);
        let mut rng = StdRng::seed_from_u64(1);
        let (subreads, unplaced) = sampler.sample_read(&key, &[b'G'; 40], &positions, &mut rng);
        assert!(subreads.is_empty());
        assert_eq!(unplaced, 4);
    }
}

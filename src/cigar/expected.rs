use super::{Op, OpKind, OpSequence};

/// Subread length the sampler draws by default; expected CIGARs are padded up
/// to this many matched bases
pub const DEFAULT_MIN_MATCH_TOTAL: u32 = 150;

/// Project the part of `long` that a subread covering `[start, stop)` should show.
///
/// A single cursor walks `long`, advanced by the length of every operation
/// whatever coordinate space it consumes. Operations overlapping the interval are
/// emitted clipped to it. If fewer than `min_match_total` Match bases result, the
/// first Match operation is extended by the remainder, or a trailing Match
/// operation is appended if there is none. Adjacent operations of the same kind
/// are not merged.
pub fn synthesize(long: &OpSequence, start: u64, stop: u64, min_match_total: u32) -> OpSequence {
    let mut expected = OpSequence::default();
    let mut pos: u64 = 0;
    let mut total_matches: u64 = 0;

    for op in long.ops() {
        if pos >= stop {
            break;
        }
        let op_end = pos + op.len as u64;
        if op_end <= start {
            pos = op_end;
            continue;
        }

        let overlap_start = start.max(pos);
        let overlap_end = stop.min(op_end);
        if overlap_end > overlap_start {
            // Bounded by op.len, so it fits
            let overlap = (overlap_end - overlap_start) as u32;
            expected.push(Op::new(overlap, op.kind));
            if op.kind == OpKind::Match {
                total_matches += overlap as u64;
            }
        }
        pos = op_end;
    }

    let min_match_total = min_match_total as u64;
    if total_matches < min_match_total {
        let remaining = (min_match_total - total_matches) as u32;
        match expected.0.iter_mut().find(|op| op.kind == OpKind::Match) {
            Some(first_match) => first_match.len = first_match.len.saturating_add(remaining),
            None => expected.push(Op::new(remaining, OpKind::Match)),
        }
    }

    expected
}

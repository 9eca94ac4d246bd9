use crate::geometry::index::SecondaryIndex;
use crate::geometry::ProjectedFeature;
use crate::matcher::{self, MatcherThresholds};
use crate::model::MatchCandidate;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// runs the matcher for every primary feature against the full secondary
/// set, returning each primary's surviving candidates indexed by the
/// primary's position in `primaries` — `results[i]` is empty when primary
/// `i` had no acceptable match.
///
/// `workers <= 1` runs a plain sequential scan instead of handing the work
/// to rayon; this is a genuinely separate code path (not rayon pinned to
/// one thread) so single-threaded runs are reproducible without a thread
/// pool in the picture at all, and useful under a debugger.
pub fn run(
    primaries: &[ProjectedFeature],
    secondaries: &[ProjectedFeature],
    thresholds: &MatcherThresholds,
    workers: usize,
    cancel: &AtomicBool,
) -> Vec<Vec<MatchCandidate>> {
    log::info!(
        "dispatching {} primaries against {} secondaries across {} worker(s)",
        primaries.len(),
        secondaries.len(),
        workers
    );

    let index = SecondaryIndex::build(secondaries);

    if workers <= 1 {
        return run_serial(primaries, secondaries, thresholds, &index, cancel);
    }

    primaries
        .par_chunks(1)
        .map(|chunk| {
            let primary = &chunk[0];
            if cancel.load(Ordering::Relaxed) {
                return Vec::new();
            }
            matcher::find_candidates(primary, secondaries, thresholds, Some(&index))
        })
        .collect()
}

fn run_serial(
    primaries: &[ProjectedFeature],
    secondaries: &[ProjectedFeature],
    thresholds: &MatcherThresholds,
    index: &SecondaryIndex,
    cancel: &AtomicBool,
) -> Vec<Vec<MatchCandidate>> {
    let mut results = Vec::with_capacity(primaries.len());
    for primary in primaries {
        if cancel.load(Ordering::Relaxed) {
            log::debug!("cancellation observed, skipping remaining primaries");
            results.push(Vec::new());
            continue;
        }
        results.push(matcher::find_candidates(primary, secondaries, thresholds, Some(index)));
    }
    results
}

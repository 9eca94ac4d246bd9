//! Matches features from an external geospatial dataset (forest-service
//! roads, trails, points of interest) against an existing OpenStreetMap
//! extract, merging tags where the two describe the same real-world
//! feature and flagging what's genuinely new.
//!
//! The entry point is [`conflate`]; [`conflate_cancellable`] is the same
//! operation with a caller-owned cancellation flag for long runs.

pub mod assemble;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod tags;

pub use config::Config;
pub use error::{ConfigError, FeatureWarning};
pub use model::{Feature, FeatureVec, Geometry, ScoreBundle, Tags};

use geometry::ProjectedFeature;
use std::sync::atomic::AtomicBool;

/// the result of conflating one primary (external) dataset against one
/// secondary (OSM) dataset.
#[derive(Debug, Clone, Default)]
pub struct ConflateOutput {
    /// secondary features whose tags changed as a result of an accepted match.
    pub updated: Vec<UpdatedFeature>,
    /// primary features with no acceptable secondary match.
    pub new: FeatureVec,
    /// non-fatal issues encountered during the run.
    pub warnings: Vec<FeatureWarning>,
}

#[derive(Debug, Clone)]
pub struct UpdatedFeature {
    pub secondary_ref: usize,
    pub merged_tags: Tags,
    pub score: model::ScoreBundle,
}

/// conflates `primary` (the external dataset) against `secondary` (the
/// existing OSM extract) under `config`. Every primary's tags are
/// normalized first (legacy tag stripping, abbreviation expansion,
/// reference synthesis) so matching always runs against canonicalized
/// tag values regardless of how the caller's loader shaped them.
///
/// Deterministic: given the same inputs and `config`, repeated calls
/// (single- or multi-threaded) produce the same output in the same order.
pub fn conflate(primary: FeatureVec, secondary: FeatureVec, config: &Config) -> ConflateOutput {
    let cancel = AtomicBool::new(false);
    conflate_cancellable(primary, secondary, config, &cancel)
}

/// [`conflate`] with a caller-owned cancellation flag. Setting `cancel`
/// mid-run stops further matching; matches already found before the flag
/// fired are still reported, but no primary is reported as New, since an
/// unexamined primary and a genuinely unmatched one look identical once
/// the run is cut short.
pub fn conflate_cancellable(
    mut primary: FeatureVec,
    secondary: FeatureVec,
    config: &Config,
    cancel: &AtomicBool,
) -> ConflateOutput {
    // only the external (primary) dataset gets cleaned up here — secondary
    // is assumed to already be canonically tagged OSM data, and leaving it
    // untouched is what lets the fuzzy tag comparator actually catch
    // divergences like an abbreviated name or an FS/FR prefix mismatch.
    log::info!(
        "conflating {} primary feature(s) against {} secondary feature(s)",
        primary.len(),
        secondary.len()
    );

    for feature in primary.iter_mut() {
        normalize::normalize_feature_tags(&mut feature.tags);
    }

    let mut warnings = Vec::new();

    let matchable_primary_idxs: Vec<usize> = primary
        .iter()
        .enumerate()
        .filter_map(|(idx, feature)| {
            if feature.geometry.is_none() {
                warnings.push(FeatureWarning::MissingGeometry { primary_ref: idx });
                return None;
            }
            if !matcher::is_matchable(feature) {
                return None;
            }
            let geom = feature.geometry.as_ref().unwrap();
            if !geom.is_structurally_valid() {
                warnings.push(FeatureWarning::InvalidGeometry {
                    primary_ref: idx,
                    kind: geom.kind().to_string(),
                });
                return None;
            }
            Some(idx)
        })
        .collect();

    // a bare way node or a feature this run never examined (missing/invalid
    // geometry) can't be reported as New — there's no real content to
    // publish and, for the geometry cases, a warning already covers it.
    let excluded_idxs: std::collections::HashSet<usize> = (0..primary.len())
        .filter(|idx| !matchable_primary_idxs.contains(idx))
        .collect();

    let projected_primary: Vec<ProjectedFeature> = matchable_primary_idxs
        .iter()
        .map(|&idx| ProjectedFeature::new(idx, &primary[idx]))
        .collect();
    let projected_secondary: Vec<ProjectedFeature> = secondary
        .iter()
        .enumerate()
        .map(|(idx, feature)| ProjectedFeature::new(idx, feature))
        .collect();

    let thresholds = config.matcher_thresholds();
    let candidates = dispatch::run(
        &projected_primary,
        &projected_secondary,
        &thresholds,
        config.workers,
        cancel,
    );

    // re-expand back to full primary-index space so displaced/new indices
    // in the assembler's output refer to `primary`, not the filtered subset.
    let mut candidates_by_primary = vec![Vec::new(); primary.len()];
    for (projected_idx, cs) in matchable_primary_idxs.iter().zip(candidates.into_iter()) {
        candidates_by_primary[*projected_idx] = cs;
    }

    let (decisions, displaced) = assemble::assemble(&primary, &secondary, candidates_by_primary);

    if !displaced.is_empty() {
        log::debug!("{} primary/primary contention(s) resolved", displaced.len());
    }
    for d in &displaced {
        warnings.push(FeatureWarning::DisplacedByContention {
            primary_ref: d.primary_ref,
            contended_secondary_ref: d.contended_secondary_ref,
            dist_m: d.dist_m,
        });
    }

    // a cancelled run stops short of examining every primary; an
    // unexamined primary looks identical to one genuinely unmatched, so
    // once cancellation has fired, New decisions are suppressed rather
    // than reported as if the run had actually looked for their match.
    let was_cancelled = cancel.load(std::sync::atomic::Ordering::Relaxed);
    if was_cancelled {
        log::warn!("run was cancelled; suppressing New decisions for unexamined primaries");
    }

    let mut updated = Vec::new();
    let mut new = FeatureVec::new();
    for decision in decisions {
        match decision {
            model::MatchDecision::Updated {
                secondary_ref,
                merged_tags,
                score,
            } => updated.push(UpdatedFeature { secondary_ref, merged_tags, score }),
            model::MatchDecision::New {
                primary_ref,
                synthesized_tags,
            } => {
                if was_cancelled || excluded_idxs.contains(&primary_ref) {
                    continue;
                }
                let mut feature = primary[primary_ref].clone();
                feature.tags = synthesized_tags;
                new.push(feature);
            }
            model::MatchDecision::Unchanged { secondary_ref, score } => {
                if config.emit_unchanged {
                    updated.push(UpdatedFeature {
                        secondary_ref,
                        merged_tags: secondary[secondary_ref].tags.clone(),
                        score,
                    });
                }
            }
        }
    }

    log::info!(
        "conflation complete: {} updated, {} new, {} warning(s)",
        updated.len(),
        new.len(),
        warnings.len()
    );

    ConflateOutput { updated, new, warnings }
}

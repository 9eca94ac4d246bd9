use crate::model::{Feature, FeatureVec, MatchCandidate, MatchDecision, ScoreBundle, Tags};
use std::collections::HashMap;

/// reduces every primary's candidate list to a final decision per primary,
/// resolving contention when two or more primaries claim the same
/// secondary feature.
///
/// A secondary can only be updated once. When multiple primaries' winning
/// candidates name the same `secondary_ref`, all but one are displaced —
/// the displaced primaries are dropped with a warning rather than
/// resubmitted as New, since a primary that matched *something* isn't
/// evidence it's actually absent from the secondary dataset, just that
/// this run couldn't reconcile the contention.
///
/// Ties break on hits descending, then distance ascending, then the
/// primary's own index ascending, so the same input always produces the
/// same winner.
pub fn assemble(
    primaries: &FeatureVec,
    secondaries: &FeatureVec,
    candidates_by_primary: Vec<Vec<MatchCandidate>>,
) -> (Vec<MatchDecision>, Vec<DisplacedPrimary>) {
    let mut best_per_primary: Vec<Option<MatchCandidate>> = candidates_by_primary
        .into_iter()
        .map(|mut cs| {
            cs.sort_by_key(MatchCandidate::ordering_key);
            cs.into_iter().next()
        })
        .collect();

    let mut claims: HashMap<usize, Vec<usize>> = HashMap::new();
    for (primary_idx, candidate) in best_per_primary.iter().enumerate() {
        if let Some(c) = candidate {
            claims.entry(c.secondary_ref).or_default().push(primary_idx);
        }
    }

    let mut displaced = Vec::new();
    for (secondary_ref, mut primary_idxs) in claims {
        if primary_idxs.len() <= 1 {
            continue;
        }
        primary_idxs.sort_by_key(|&idx| {
            let c = best_per_primary[idx].as_ref().unwrap();
            (std::cmp::Reverse(c.tag_hits), ordered_bits(c.dist_m), idx)
        });
        for &loser_idx in &primary_idxs[1..] {
            let lost = best_per_primary[loser_idx].take().unwrap();
            log::debug!(
                "primary {} displaced from secondary {} by a stronger claim",
                loser_idx,
                secondary_ref
            );
            displaced.push(DisplacedPrimary {
                primary_ref: loser_idx,
                contended_secondary_ref: secondary_ref,
                dist_m: lost.dist_m,
            });
        }
    }

    let displaced_idxs: std::collections::HashSet<usize> =
        displaced.iter().map(|d| d.primary_ref).collect();

    // a primary that lost contention isn't evidence it's absent from the
    // secondary dataset — it's dropped outright, not resubmitted as New.
    let decisions = best_per_primary
        .into_iter()
        .enumerate()
        .filter(|(primary_idx, _)| !displaced_idxs.contains(primary_idx))
        .map(|(primary_idx, candidate)| match candidate {
            Some(c) => {
                let score = ScoreBundle {
                    hits: c.tag_hits,
                    dist_m: c.dist_m,
                    slope_delta: c.slope_delta,
                    angle_deg: c.angle_deg,
                };
                if c.merged_tags == secondaries[c.secondary_ref].tags {
                    MatchDecision::Unchanged { secondary_ref: c.secondary_ref, score }
                } else {
                    MatchDecision::Updated {
                        secondary_ref: c.secondary_ref,
                        merged_tags: c.merged_tags,
                        score,
                    }
                }
            }
            None => MatchDecision::New {
                primary_ref: primary_idx,
                synthesized_tags: synthesize_new_tags(&primaries[primary_idx]),
            },
        })
        .collect();

    (decisions, displaced)
}

/// a primary feature dropped after losing a contended secondary match.
#[derive(Debug, Clone)]
pub struct DisplacedPrimary {
    pub primary_ref: usize,
    pub contended_secondary_ref: usize,
    pub dist_m: f64,
}

/// a float sort key with no NaN handling needed: distances here always
/// come from [`crate::geometry::distance`], which never returns NaN.
fn ordered_bits(v: f64) -> u64 {
    v.to_bits()
}

fn synthesize_new_tags(primary: &Feature) -> Tags {
    let mut tags = primary.tags.clone();
    tags.insert("version".to_string(), "1".to_string());
    tags.insert("informal".to_string(), "yes".to_string());
    tags.insert(
        "fixme".to_string(),
        "New features should be imported following OSM guidelines.".to_string(),
    );
    tags
}

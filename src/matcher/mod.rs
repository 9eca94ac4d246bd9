use crate::geometry::index::SecondaryIndex;
use crate::geometry::{self, ProjectedFeature};
use crate::model::{Feature, MatchCandidate};
use crate::tags::{self, TagThresholds};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherThresholds {
    pub max_distance_m: f64,
    /// angle/slope gate for the `hits == 1` "strong alignment" rule —
    /// fixed narrower than the caller-facing thresholds below, since a
    /// single tag hit needs tight geometric corroboration to accept.
    pub max_angle_deg: f64,
    pub max_slope_delta: f64,
    /// caller-facing angle threshold used to reject a `hits == 0` pair
    /// outright, independent of `max_angle_deg`'s single-hit gate.
    pub angle_threshold_deg: f64,
    /// caller-facing slope threshold, independent of `max_slope_delta`.
    pub slope_threshold: f64,
    pub tags: TagThresholds,
    /// candidates to examine before giving up on a primary; a forest-road
    /// network rarely has more than a handful of plausible neighbors within
    /// `max_distance_m`, so this bounds worst-case scan cost per primary.
    pub scan_cap: usize,
    /// reject a Point/LineString pairing outright rather than measuring
    /// point-to-polyline distance. On for line datasets, where a stray
    /// point candidate is never a legitimate match for a road or trail;
    /// off for POI datasets, which have no lines to cross against anyway.
    pub reject_point_line_cross: bool,
}

impl Default for MatcherThresholds {
    fn default() -> Self {
        MatcherThresholds {
            max_distance_m: 2.0,
            max_angle_deg: 15.0,
            max_slope_delta: 1.0,
            angle_threshold_deg: 20.0,
            slope_threshold: 4.0,
            tags: TagThresholds::default(),
            scan_cap: 5,
            reject_point_line_cross: true,
        }
    }
}

/// whether a primary/secondary pair's geometry-and-tag score clears the bar
/// to be treated as the same real-world feature:
///
/// - two or more matching tags, regardless of geometry closeness, or
/// - exactly one matching tag plus a tight geometric match (angle and
///   slope both within a narrow band), or
/// - no tag match at all, but geometry that coincides exactly — and, short
///   of that, a `hits == 0` pair is rejected outright once its angle or
///   slope delta clears the caller's own (looser) thresholds, on the
///   assumption it's a parallel road rather than the same feature.
fn accepts(hits: u8, dist_m: f64, angle_deg: f64, slope_delta: f64, t: &MatcherThresholds) -> bool {
    if dist_m > t.max_distance_m {
        return false;
    }
    match hits {
        0 => {
            if angle_deg.abs() > t.angle_threshold_deg || slope_delta.abs() > t.slope_threshold {
                return false;
            }
            dist_m == 0.0 && angle_deg == 0.0 && slope_delta == 0.0
        }
        1 => angle_deg.abs() < t.max_angle_deg && slope_delta.abs() < t.max_slope_delta,
        _ => true,
    }
}

/// finds every secondary feature that plausibly matches `primary`, ordered
/// hits-descending then distance-ascending. When `thresholds.reject_point_line_cross`
/// is set, a Point primary is never compared against a LineString secondary
/// or vice versa — POIs don't conflate against roads.
///
/// `index`, when given, prunes the secondaries examined to those whose
/// bounding box falls within `thresholds.max_distance_m` of `primary`'s —
/// this is the spec's allowed spatial-index optimization, not a change in
/// which matches are accepted. Passing `None` scans every secondary in
/// input order, which is what a small dataset or a unit test wants.
pub fn find_candidates(
    primary: &ProjectedFeature,
    secondaries: &[ProjectedFeature],
    thresholds: &MatcherThresholds,
    index: Option<&SecondaryIndex>,
) -> Vec<MatchCandidate> {
    let Some(primary_geom) = primary.geometry.as_ref() else {
        return Vec::new();
    };

    let candidate_order: Vec<usize> = match index.zip(geometry::bounding_box(primary_geom)) {
        Some((idx, bbox)) => idx.nearby(bbox, thresholds.max_distance_m),
        None => (0..secondaries.len()).collect(),
    };

    let mut candidates = Vec::new();
    let mut scanned = 0usize;

    for &secondary_idx in &candidate_order {
        if scanned >= thresholds.scan_cap {
            break;
        }
        let secondary = &secondaries[secondary_idx];
        let Some(secondary_geom) = secondary.geometry.as_ref() else {
            continue;
        };

        let dist_m = geometry::distance(primary_geom, secondary_geom, thresholds.reject_point_line_cross);
        if dist_m > thresholds.max_distance_m {
            continue;
        }
        scanned += 1;

        let (angle_deg, slope_delta) = geometry::slope_and_angle(primary_geom, secondary_geom);
        let (hits, merged_tags) = tags::compare(&primary.source.tags, &secondary.source.tags, &thresholds.tags);

        if !accepts(hits, dist_m, angle_deg, slope_delta, thresholds) {
            continue;
        }

        candidates.push(MatchCandidate {
            primary_ref: primary.index,
            secondary_ref: secondary.index,
            dist_m,
            angle_deg,
            slope_delta,
            tag_hits: hits,
            merged_tags,
        });

        if hits == 3 {
            break;
        }
    }

    candidates.sort_by_key(MatchCandidate::ordering_key);
    candidates
}

/// a Point feature carrying nothing beyond way-node scaffolding tags isn't
/// a POI and shouldn't be offered to the matcher at all.
pub fn is_matchable(feature: &Feature) -> bool {
    !feature.is_bare_way_node()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Feature, Geometry, Tags};

    fn feature(geom: Geometry, tags: &[(&str, &str)]) -> Feature {
        Feature::new(
            Some(geom),
            tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<Tags>(),
        )
    }

    #[test]
    fn two_tag_hits_accept_regardless_of_geometry_looseness() {
        let t = MatcherThresholds::default();
        assert!(accepts(2, 1.5, 80.0, 5.0, &t));
    }

    #[test]
    fn single_hit_requires_tight_geometry() {
        let t = MatcherThresholds::default();
        assert!(accepts(1, 1.5, 5.0, 0.2, &t));
        assert!(!accepts(1, 1.5, 20.0, 0.2, &t));
    }

    #[test]
    fn zero_hits_requires_exact_geometry() {
        let t = MatcherThresholds::default();
        assert!(!accepts(0, 0.5, 0.0, 0.0, &t));
        assert!(accepts(0, 0.0, 0.0, 0.0, &t));
    }

    #[test]
    fn zero_hits_rejected_outright_past_the_caller_thresholds() {
        let t = MatcherThresholds::default();
        assert!(!accepts(0, 0.5, 25.0, 0.0, &t));
        assert!(!accepts(0, 0.5, 0.0, 5.0, &t));
    }

    #[test]
    fn reject_point_line_cross_is_a_caller_choice() {
        let primary = feature(Geometry::point(0.0, 0.0), &[("name", "Trailhead")]);
        let secondary = feature(
            Geometry::line_string(vec![(0.0, 0.0), (0.0, 0.0001)]),
            &[("name", "Trailhead")],
        );
        let primaries = [ProjectedFeature::new(0, &primary)];
        let secondaries = [ProjectedFeature::new(0, &secondary)];
        let mut t = MatcherThresholds::default();
        t.reject_point_line_cross = false;
        let candidates = find_candidates(&primaries[0], &secondaries, &t, None);
        assert!(!candidates.is_empty());
    }

    #[test]
    fn point_candidate_never_matches_line_secondary() {
        let primary = feature(Geometry::point(0.0, 0.0), &[("name", "Trailhead")]);
        let secondary = feature(
            Geometry::line_string(vec![(0.0, 0.0), (0.0, 0.0001)]),
            &[("name", "Trailhead")],
        );
        let primaries = [ProjectedFeature::new(0, &primary)];
        let secondaries = [ProjectedFeature::new(0, &secondary)];
        let candidates = find_candidates(&primaries[0], &secondaries, &MatcherThresholds::default(), None);
        assert!(candidates.is_empty());
    }

    #[test]
    fn pruned_and_unpruned_scans_agree() {
        let primary = feature(Geometry::point(0.0, 0.0), &[("name", "Trailhead")]);
        let secondary = feature(Geometry::point(0.0, 0.0), &[("name", "Trailhead")]);
        let primaries = [ProjectedFeature::new(0, &primary)];
        let secondaries = [ProjectedFeature::new(0, &secondary)];
        let t = MatcherThresholds::default();

        let unpruned = find_candidates(&primaries[0], &secondaries, &t, None);
        let index = SecondaryIndex::build(&secondaries);
        let pruned = find_candidates(&primaries[0], &secondaries, &t, Some(&index));

        assert_eq!(unpruned.len(), pruned.len());
        assert_eq!(unpruned[0].secondary_ref, pruned[0].secondary_ref);
    }
}

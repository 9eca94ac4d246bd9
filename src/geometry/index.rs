use super::{bounding_box, ProjectedFeature};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, RTreeObject};

type IndexedSecondary = GeomWithData<Rectangle<(f64, f64)>, usize>;

/// spatial index over a fixed secondary set's projected geometries, built
/// once per run and reused across every primary so `matcher::find_candidates`
/// only has to touch secondaries whose bounding box could plausibly fall
/// within range, rather than scanning the whole dataset per primary. This is
/// the pruning optimization — it never changes which candidates are
/// accepted, only how many are checked against the exact distance test.
pub struct SecondaryIndex {
    tree: RTree<IndexedSecondary>,
}

impl SecondaryIndex {
    pub fn build(secondaries: &[ProjectedFeature]) -> Self {
        let entries = secondaries
            .iter()
            .filter_map(|s| {
                let (min, max) = bounding_box(s.geometry.as_ref()?)?;
                Some(GeomWithData::new(Rectangle::from_corners(min, max), s.index))
            })
            .collect();
        SecondaryIndex { tree: RTree::bulk_load(entries) }
    }

    /// secondary indices whose bounding box lies within `max_distance_m` of
    /// `primary_bbox`, in ascending index order. Inflating the query by
    /// `max_distance_m` on every side is a sufficient (not exact) test: any
    /// secondary whose true minimum distance to the primary is within range
    /// is guaranteed to intersect the inflated box, so this never drops a
    /// real candidate — it can only admit a few extra ones for the caller's
    /// exact distance test to reject. Sorting by index keeps the pruned scan
    /// order fixed regardless of the tree's internal traversal order.
    pub fn nearby(&self, primary_bbox: ((f64, f64), (f64, f64)), max_distance_m: f64) -> Vec<usize> {
        let ((min_x, min_y), (max_x, max_y)) = primary_bbox;
        let query = Rectangle::from_corners(
            (min_x - max_distance_m, min_y - max_distance_m),
            (max_x + max_distance_m, max_y + max_distance_m),
        );
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query.envelope())
            .map(|entry| entry.data)
            .collect();
        hits.sort_unstable();
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Feature, Geometry, Tags};

    fn feature(lon: f64, lat: f64) -> Feature {
        Feature::new(Some(Geometry::point(lon, lat)), Tags::new())
    }

    #[test]
    fn nearby_finds_close_secondary_and_skips_far_one() {
        let raw = vec![feature(0.0, 0.0), feature(1000.0, 1000.0)];
        let projected: Vec<_> = raw.iter().enumerate().map(|(i, f)| ProjectedFeature::new(i, f)).collect();
        let index = SecondaryIndex::build(&projected);

        let hits = index.nearby(((-1.0, -1.0), (1.0, 1.0)), 10.0);
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn nearby_returns_indices_in_ascending_order() {
        let raw = vec![feature(5.0, 5.0), feature(-5.0, -5.0), feature(0.0, 0.0)];
        let projected: Vec<_> = raw.iter().enumerate().map(|(i, f)| ProjectedFeature::new(i, f)).collect();
        let index = SecondaryIndex::build(&projected);

        let hits = index.nearby(((-1.0, -1.0), (1.0, 1.0)), 10.0);
        assert_eq!(hits, vec![0, 1, 2]);
    }
}

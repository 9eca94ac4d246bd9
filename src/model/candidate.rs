use super::feature::Tags;

/// one surviving secondary for a given primary, produced by the matcher
/// and discarded once the assembler has picked a winner.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub primary_ref: usize,
    pub secondary_ref: usize,
    pub dist_m: f64,
    pub angle_deg: f64,
    pub slope_delta: f64,
    pub tag_hits: u8,
    pub merged_tags: Tags,
}

impl MatchCandidate {
    /// hits descending, then distance ascending.
    pub fn ordering_key(&self) -> (std::cmp::Reverse<u8>, ordered_float::NotNan<f64>) {
        (
            std::cmp::Reverse(self.tag_hits),
            ordered_float::NotNan::new(self.dist_m).unwrap_or_else(|_| ordered_float::NotNan::new(f64::MAX).unwrap()),
        )
    }
}

mod ordered_float {
    /// minimal NaN-rejecting float wrapper sized for sorting candidates by
    /// distance; avoids pulling in the `ordered-float` crate for one comparator.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct NotNan<T>(T);

    impl NotNan<f64> {
        pub fn new(v: f64) -> Result<Self, ()> {
            if v.is_nan() {
                Err(())
            } else {
                Ok(NotNan(v))
            }
        }
    }

    impl Eq for NotNan<f64> {}

    impl PartialOrd for NotNan<f64> {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for NotNan<f64> {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
        }
    }
}

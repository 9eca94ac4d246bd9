use super::feature::Tags;

/// the score that justified a decision, carried through for logging and
/// for callers that want to audit a run rather than just consume it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBundle {
    pub hits: u8,
    pub dist_m: f64,
    pub slope_delta: f64,
    pub angle_deg: f64,
}

/// the outcome of reconciling one primary (external) feature against the
/// secondary (OSM) dataset.
#[derive(Debug, Clone)]
pub enum MatchDecision {
    /// primary matched an existing secondary feature; `merged_tags` replaces
    /// the secondary's tag set and `secondary_ref` names which feature to update.
    Updated {
        secondary_ref: usize,
        merged_tags: Tags,
        score: ScoreBundle,
    },
    /// primary had no acceptable secondary match; emit it as a new feature.
    New {
        primary_ref: usize,
        synthesized_tags: Tags,
    },
    /// best candidate's merged tags equal the secondary's existing tags
    /// exactly — nothing to write. `score` is kept (unlike the bare
    /// `secondary_ref` spec.md describes) so a caller auditing a run can
    /// see why the match was accepted even though it produced no change.
    Unchanged {
        secondary_ref: usize,
        score: ScoreBundle,
    },
}
